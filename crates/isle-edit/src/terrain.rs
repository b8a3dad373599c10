use std::sync::Arc;

use isle_chunk::{ChunkMesh, Occupant, SlotTable};
use isle_geom::{ChunkCoord, GridDims, GridError, GridPoint, GridRect, GridTile, Vec3};
use isle_world::{Heightfield, World};

/// The terrain of one session: chunk grid, water level and edit bookkeeping.
///
/// Between calls the terrain is always consistent: every chunk sharing a point
/// reports the same height, and adjacent points differ by at most one level.
pub struct Terrain {
    world: World,
    dims: GridDims,
    chunks: Vec<ChunkMesh>,
    water_level: i32,
    max_water_level: i32,
    // Change tracking per chunk, indexed like `chunks`.
    rev: Vec<u64>,
    built: Vec<u64>,
    counter: u64,
}

impl Terrain {
    /// Generates the island for the world's seed.
    pub fn generate(world: &World) -> Self {
        let field = world.generate_heightfield();
        Self::from_heightfield(world, &field)
    }

    /// Builds the chunk grid from an existing heightfield (which must use the world's dims).
    pub fn from_heightfield(world: &World, field: &Heightfield) -> Self {
        let dims = world.dims();
        let slots = Arc::new(SlotTable::new(dims.tiles_per_chunk as usize));
        let mut chunks = Vec::with_capacity(dims.chunk_count());
        for cz in 0..dims.chunks_z {
            for cx in 0..dims.chunks_x {
                chunks.push(ChunkMesh::from_heightfield(
                    ChunkCoord::new(cx, cz),
                    Arc::clone(&slots),
                    field,
                ));
            }
        }
        let n = chunks.len();
        Self {
            world: world.clone(),
            dims,
            chunks,
            water_level: world.params.initial_water_level,
            max_water_level: world.params.max_water_level,
            rev: vec![1; n],
            built: vec![0; n],
            counter: 1,
        }
    }

    #[inline]
    pub fn dims(&self) -> &GridDims {
        &self.dims
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn chunks(&self) -> &[ChunkMesh] {
        &self.chunks
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        if !self.dims.contains_chunk(coord.cx, coord.cz) {
            return None;
        }
        self.chunks.get(coord.index(&self.dims))
    }

    #[inline]
    pub fn point_in_bounds(&self, p: GridPoint) -> bool {
        p.in_bounds(&self.dims)
    }

    #[inline]
    pub fn tile_in_bounds(&self, tile: GridTile) -> bool {
        tile.in_bounds(&self.dims)
    }

    /// Height level of a point; `None` outside the terrain.
    pub fn point_level(&self, p: GridPoint) -> Option<i32> {
        if !p.in_bounds(&self.dims) {
            return None;
        }
        Some(self.level_at(p))
    }

    /// Level of an in-bounds point, read from the first chunk that owns it.
    pub(crate) fn level_at(&self, p: GridPoint) -> i32 {
        let mut chunks = p.chunks(&self.dims);
        match chunks.next() {
            Some(c) => {
                let chunk = &self.chunks[c.index(&self.dims)];
                match chunk.local_point(p) {
                    Some((lx, lz)) => chunk.point_level(lx, lz),
                    None => 0,
                }
            }
            None => 0,
        }
    }

    /// Every chunk sharing `p` paired with its reported level.
    pub fn point_levels_by_chunk(&self, p: GridPoint) -> Vec<(ChunkCoord, i32)> {
        p.chunks(&self.dims)
            .filter_map(|c| {
                let chunk = &self.chunks[c.index(&self.dims)];
                chunk
                    .local_point(p)
                    .map(|(lx, lz)| (c, chunk.point_level(lx, lz)))
            })
            .collect()
    }

    pub fn point_world(&self, p: GridPoint) -> Option<Vec3> {
        self.point_level(p).map(|level| p.to_world(&self.dims, level))
    }

    /// Nearest grid point to a world position.
    pub fn point_at_world(&self, pos: Vec3) -> Result<GridPoint, GridError> {
        GridPoint::from_world(pos, &self.dims)
    }

    /// Tile under a world position.
    pub fn tile_at_world(&self, pos: Vec3) -> Result<GridTile, GridError> {
        GridTile::containing(pos, &self.dims)
    }

    fn tile_chunk(&self, tile: GridTile) -> Option<(&ChunkMesh, usize, usize)> {
        if !tile.in_bounds(&self.dims) {
            return None;
        }
        let chunk = &self.chunks[tile.chunk(&self.dims).index(&self.dims)];
        let (tx, tz) = tile.local(&self.dims);
        Some((chunk, tx, tz))
    }

    /// Tile center height in half-steps.
    pub fn tile_center_half_steps(&self, tile: GridTile) -> Option<i32> {
        self.tile_chunk(tile)
            .map(|(chunk, tx, tz)| chunk.center_half_steps(tx, tz))
    }

    pub fn tile_center_world(&self, tile: GridTile) -> Option<Vec3> {
        self.tile_center_half_steps(tile)
            .map(|h| tile.center_world(&self.dims, h))
    }

    pub fn is_tile_flat(&self, tile: GridTile) -> bool {
        self.tile_chunk(tile)
            .is_some_and(|(chunk, tx, tz)| chunk.is_tile_flat(tx, tz, self.water_level))
    }

    /// A `w x h` block of tiles starting at `origin` is flat, dry and at one shared level.
    pub fn is_area_flat(&self, origin: GridTile, w: i32, h: i32) -> bool {
        if w <= 0 || h <= 0 {
            return false;
        }
        let Some(level) = self.point_level(origin.corner(isle_geom::TileCorner::BottomLeft)) else {
            return false;
        };
        for dz in 0..h {
            for dx in 0..w {
                let tile = GridTile::new(origin.x + dx, origin.z + dz);
                if !self.is_tile_flat(tile) {
                    return false;
                }
                if self.point_level(tile.corner(isle_geom::TileCorner::BottomLeft)) != Some(level) {
                    return false;
                }
            }
        }
        true
    }

    pub fn occupancy(&self, tile: GridTile) -> Option<Occupant> {
        self.tile_chunk(tile)
            .and_then(|(chunk, tx, tz)| chunk.occupancy(tx, tz))
    }

    pub fn set_occupancy(&mut self, tile: GridTile, occupant: Option<Occupant>) -> Result<(), GridError> {
        let tile = GridTile::checked(tile.x, tile.z, &self.dims)?;
        let idx = tile.chunk(&self.dims).index(&self.dims);
        let (tx, tz) = tile.local(&self.dims);
        self.chunks[idx].set_occupancy(tx, tz, occupant);
        Ok(())
    }

    #[inline]
    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    #[inline]
    pub fn max_water_level(&self) -> i32 {
        self.max_water_level
    }

    #[inline]
    pub fn is_max_water_level_reached(&self) -> bool {
        self.water_level >= self.max_water_level
    }

    /// Floods by one step. Returns `false` (and changes nothing) at the maximum.
    pub fn raise_water_level(&mut self) -> bool {
        if self.is_max_water_level_reached() {
            log::debug!(target: "terrain", "water level already at max {}", self.max_water_level);
            return false;
        }
        self.water_level += 1;
        log::info!(target: "terrain", "water level raised to {}", self.water_level);
        true
    }

    /// Copy of all point levels.
    pub fn heightfield(&self) -> Heightfield {
        let mut field = Heightfield::flat(self.dims, 0);
        for p in GridRect::full(&self.dims).points() {
            field.set(p, self.level_at(p));
        }
        field
    }

    /// Opens a new edit revision; subsequent writes stamp touched chunks with it.
    pub(crate) fn begin_edit(&mut self) {
        self.counter = self.counter.wrapping_add(1).max(1);
    }

    /// The only vertex-height write path: updates `p` in every chunk that shares it.
    /// Returns whether the level changed.
    pub(crate) fn write_level(&mut self, p: GridPoint, level: i32) -> bool {
        let mut changed = false;
        for c in p.chunks(&self.dims) {
            let idx = c.index(&self.dims);
            let chunk = &mut self.chunks[idx];
            if let Some((lx, lz)) = chunk.local_point(p) {
                if chunk.set_point_level(lx, lz, level) {
                    changed = true;
                    self.rev[idx] = self.counter;
                }
            }
        }
        changed
    }

    /// Recomputes the centers of every tile touching a point of `area`.
    pub(crate) fn refresh_centers(&mut self, area: GridRect) {
        let min_x = (area.min.x - 1).max(0);
        let min_z = (area.min.z - 1).max(0);
        let max_x = area.max.x.min(self.dims.tiles_x() - 1);
        let max_z = area.max.z.min(self.dims.tiles_z() - 1);
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                let tile = GridTile::new(x, z);
                let idx = tile.chunk(&self.dims).index(&self.dims);
                let (tx, tz) = tile.local(&self.dims);
                self.chunks[idx].recompute_tile_center(tx, tz);
                self.rev[idx] = self.counter;
            }
        }
    }

    #[inline]
    pub fn chunk_rev(&self, coord: ChunkCoord) -> u64 {
        self.rev[coord.index(&self.dims)]
    }

    /// Chunks whose vertex data changed since their mesh was last built.
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(i, _)| self.rev[*i] > self.built[*i])
            .map(|(_, c)| c.coord)
            .collect()
    }

    pub fn mark_built(&mut self, coord: ChunkCoord, rev: u64) {
        let e = &mut self.built[coord.index(&self.dims)];
        if rev > *e {
            *e = rev;
        }
    }

    /// Shows chunks intersecting `region` and hides the rest.
    pub fn set_visible_region(&mut self, region: GridRect) {
        let dims = self.dims;
        for chunk in &mut self.chunks {
            chunk.visible = chunk.coord.point_rect(&dims).intersects(&region);
        }
    }

    /// Debug dump, top row first: `~` under water, otherwise the level in base 36.
    pub fn ascii(&self) -> String {
        let mut out = String::with_capacity(self.dims.point_count() + self.dims.points_z() as usize);
        for z in (0..self.dims.points_z()).rev() {
            for x in 0..self.dims.points_x() {
                let level = self.level_at(GridPoint::new(x, z));
                let ch = if level <= self.water_level {
                    '~'
                } else {
                    std::char::from_digit(level.clamp(0, 35) as u32, 36).unwrap_or('#')
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
