use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashMap;
use isle_edit::{Direction, EditReport, StructureHook, Terrain};
use isle_geom::{ChunkCoord, GridPoint, GridRect};
use isle_mesh_cpu::{BorderWalls, MeshBuild, Minimap, build_chunk_surface, build_water_plane};
use isle_world::World;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::command::{EditCommand, EditEnvelope};
use crate::error::EditError;
use crate::hash::terrain_hash;

/// Worker pool for chunk surface rebuilds; one pool can serve many sessions.
pub fn build_mesh_pool(threads: usize) -> Result<Arc<ThreadPool>, ThreadPoolBuildError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("isle-mesh-{i}"))
        .build()?;
    Ok(Arc::new(pool))
}

/// Cached surface of one chunk with the terrain revision it was built from.
pub struct ChunkSurface {
    pub rev: u64,
    pub mesh: MeshBuild,
}

/// Everything one participant holds: terrain, its derived render data and
/// structure hooks. Commands are applied here in order, with every follow-up
/// finished before `apply` returns.
pub struct Session {
    terrain: Terrain,
    walls: BorderWalls,
    minimap: Minimap,
    surfaces: HashMap<ChunkCoord, ChunkSurface>,
    water_plane: MeshBuild,
    hooks: Vec<Box<dyn StructureHook>>,
    log: Vec<EditEnvelope>,
    pool: Arc<ThreadPool>,
}

impl Session {
    pub fn new(world: &World, pool: Arc<ThreadPool>) -> Self {
        let terrain = Terrain::generate(world);
        let walls = BorderWalls::new(&terrain);
        let minimap = Minimap::new(&terrain);
        let water_plane = build_water_plane(terrain.dims(), terrain.water_level());
        let mut session = Self {
            terrain,
            walls,
            minimap,
            surfaces: HashMap::new(),
            water_plane,
            hooks: Vec::new(),
            log: Vec::new(),
            pool,
        };
        session.rebuild_dirty_surfaces();
        log::info!(
            target: "session",
            "session ready: {} chunks, water {}",
            session.surfaces.len(),
            session.terrain.water_level()
        );
        session
    }

    pub fn add_hook(&mut self, hook: Box<dyn StructureHook>) {
        self.hooks.push(hook);
    }

    #[inline]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Direct terrain access for placing occupants; height edits go through [`apply`](Self::apply).
    #[inline]
    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    #[inline]
    pub fn walls(&self) -> &BorderWalls {
        &self.walls
    }

    #[inline]
    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    #[inline]
    pub fn water_plane(&self) -> &MeshBuild {
        &self.water_plane
    }

    #[inline]
    pub fn surface(&self, coord: ChunkCoord) -> Option<&ChunkSurface> {
        self.surfaces.get(&coord)
    }

    #[inline]
    pub fn edit_log(&self) -> &[EditEnvelope] {
        &self.log
    }

    #[inline]
    pub fn next_seq(&self) -> u64 {
        self.log.last().map_or(0, |e| e.seq + 1)
    }

    pub fn state_hash(&self) -> u64 {
        terrain_hash(&self.terrain)
    }

    fn check_point(&self, p: GridPoint) -> Result<(), EditError> {
        GridPoint::checked(p.x, p.z, self.terrain.dims())?;
        Ok(())
    }

    /// Authority checks run by the host before a command is sequenced.
    pub fn validate(&self, cmd: &EditCommand) -> Result<(), EditError> {
        match *cmd {
            EditCommand::MoldTerrain { point, .. } => {
                self.check_point(point)?;
                for hook in &self.hooks {
                    if let Some((tile, occupant)) = self.terrain.blocking_occupant(point, &**hook) {
                        return Err(EditError::Blocked { tile, occupant });
                    }
                }
                Ok(())
            }
            EditCommand::CauseEarthquake { center, radius, .. }
            | EditCommand::CauseVolcano { center, radius } => {
                self.check_point(center)?;
                let dims = self.terrain.dims();
                if radius < 0 || radius > dims.tiles_x().max(dims.tiles_z()) {
                    return Err(EditError::InvalidRadius(radius));
                }
                Ok(())
            }
            EditCommand::RaiseWaterLevel => {
                if self.terrain.is_max_water_level_reached() {
                    return Err(EditError::WaterLevelAtMaximum);
                }
                Ok(())
            }
        }
    }

    /// Applies the next command in sequence and runs every follow-up: walls,
    /// minimap, structure hooks and surface rebuilds. Returns the affected area.
    pub fn apply(&mut self, env: &EditEnvelope) -> Result<Option<GridRect>, EditError> {
        let expected = self.next_seq();
        if env.seq != expected {
            return Err(EditError::OutOfOrder {
                expected,
                got: env.seq,
            });
        }
        let start = Instant::now();
        let area = match env.cmd {
            EditCommand::MoldTerrain { point, lower } => {
                let report = self.terrain.modify_point(point, Direction::from_lower(lower));
                self.follow_up(&report)
            }
            EditCommand::CauseEarthquake {
                center,
                radius,
                seed,
            } => {
                let report = self.terrain.earthquake(center, radius, seed);
                self.follow_up(&report)
            }
            EditCommand::CauseVolcano { center, radius } => {
                let report = self.terrain.volcano(center, radius);
                self.follow_up(&report)
            }
            EditCommand::RaiseWaterLevel => self.flood()?,
        };
        let rebuilt = self.rebuild_dirty_surfaces();
        self.log.push(env.clone());
        log::info!(
            target: "session",
            "[seq {}] {} area={:?} rebuilt={} in {}ms",
            env.seq,
            env.cmd.name(),
            area,
            rebuilt,
            start.elapsed().as_millis()
        );
        Ok(area)
    }

    fn follow_up(&mut self, report: &EditReport) -> Option<GridRect> {
        let area = report.area?;
        if !report.perimeter.is_empty() {
            self.walls.modify_at_points(&report.perimeter, &self.terrain);
        }
        self.minimap.update_region(area, &self.terrain);
        self.notify_hooks(area);
        Some(area)
    }

    fn flood(&mut self) -> Result<Option<GridRect>, EditError> {
        if !self.terrain.raise_water_level() {
            return Err(EditError::WaterLevelAtMaximum);
        }
        let full = GridRect::full(self.terrain.dims());
        self.walls.rebuild_all(&self.terrain);
        self.minimap.rebuild_all(&self.terrain);
        self.water_plane = build_water_plane(self.terrain.dims(), self.terrain.water_level());
        // Surface colors depend on the water level.
        for s in self.surfaces.values_mut() {
            s.rev = 0;
        }
        self.notify_hooks(full);
        Ok(Some(full))
    }

    fn notify_hooks(&mut self, area: GridRect) {
        for hook in &mut self.hooks {
            hook.on_terrain_modified(area, &self.terrain);
        }
    }

    /// Rebuilds surfaces of dirty or stale chunks on the mesh pool. Returns how many were built.
    pub fn rebuild_dirty_surfaces(&mut self) -> usize {
        let mut jobs: Vec<(ChunkCoord, u64)> = self
            .terrain
            .dirty_chunks()
            .into_iter()
            .map(|c| (c, self.terrain.chunk_rev(c)))
            .collect();
        for (c, s) in &self.surfaces {
            if s.rev == 0 && !jobs.iter().any(|(j, _)| j == c) {
                jobs.push((*c, self.terrain.chunk_rev(*c)));
            }
        }
        if jobs.is_empty() {
            return 0;
        }
        let terrain = &self.terrain;
        let water = terrain.water_level();
        let built: Vec<(ChunkCoord, u64, MeshBuild)> = self.pool.install(|| {
            jobs.par_iter()
                .filter_map(|&(c, rev)| {
                    terrain
                        .chunk(c)
                        .map(|chunk| (c, rev, build_chunk_surface(chunk, water)))
                })
                .collect()
        });
        let n = built.len();
        for (c, rev, mesh) in built {
            self.terrain.mark_built(c, rev);
            self.surfaces.insert(c, ChunkSurface { rev, mesh });
        }
        log::debug!(target: "session", "rebuilt {} chunk surfaces", n);
        n
    }
}
