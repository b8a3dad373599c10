//! Skirt walls closing the four sides of the terrain.

use isle_edit::Terrain;
use isle_geom::{GridDims, GridPoint, Vec3};

use crate::mesh_build::MeshBuild;
use crate::palette::{WALL_COLOR, with_alpha};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// z = 0
    South,
    /// x = tiles_x
    East,
    /// z = tiles_z
    North,
    /// x = 0
    West,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [
        WallSide::South,
        WallSide::East,
        WallSide::North,
        WallSide::West,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            WallSide::South => 0,
            WallSide::East => 1,
            WallSide::North => 2,
            WallSide::West => 3,
        }
    }

    /// Outward horizontal normal.
    pub fn normal(self) -> Vec3 {
        match self {
            WallSide::South => Vec3::new(0.0, 0.0, -1.0),
            WallSide::East => Vec3::new(1.0, 0.0, 0.0),
            WallSide::North => Vec3::new(0.0, 0.0, 1.0),
            WallSide::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// Number of rim points along this side.
    pub fn len(self, dims: &GridDims) -> usize {
        match self {
            WallSide::South | WallSide::North => dims.points_x() as usize,
            WallSide::East | WallSide::West => dims.points_z() as usize,
        }
    }

    /// The `i`-th perimeter point of this side, walking along +x or +z.
    pub fn point(self, i: usize, dims: &GridDims) -> GridPoint {
        let i = i as i32;
        match self {
            WallSide::South => GridPoint::new(i, 0),
            WallSide::East => GridPoint::new(dims.tiles_x(), i),
            WallSide::North => GridPoint::new(i, dims.tiles_z()),
            WallSide::West => GridPoint::new(0, i),
        }
    }

    /// Sides containing `p` with `p`'s index along each: none for interior
    /// points, two at the corners.
    pub fn of_point(p: GridPoint, dims: &GridDims) -> Vec<(WallSide, usize)> {
        let mut out = Vec::with_capacity(2);
        if p.z == 0 {
            out.push((WallSide::South, p.x as usize));
        }
        if p.is_last_x(dims) {
            out.push((WallSide::East, p.z as usize));
        }
        if p.is_last_z(dims) {
            out.push((WallSide::North, p.x as usize));
        }
        if p.x == 0 {
            out.push((WallSide::West, p.z as usize));
        }
        if !p.in_bounds(dims) {
            out.clear();
        }
        out
    }
}

/// Four wall strips whose top edge follows `max(level, water_level)` along the
/// perimeter and whose bottom edge sits at a fixed floor.
pub struct BorderWalls {
    dims: GridDims,
    floor_y: f32,
    rims: [Vec<f32>; 4],
    meshes: [MeshBuild; 4],
    rebuilds: [u64; 4],
}

impl BorderWalls {
    pub fn new(terrain: &Terrain) -> Self {
        let dims = *terrain.dims();
        let mut walls = Self {
            dims,
            floor_y: terrain.world().params.wall_floor_y,
            rims: WallSide::ALL.map(|s| vec![0.0; s.len(&dims)]),
            meshes: Default::default(),
            rebuilds: [0; 4],
        };
        walls.rebuild_all(terrain);
        walls
    }

    fn rim_y(&self, p: GridPoint, terrain: &Terrain) -> f32 {
        let level = terrain.point_level(p).unwrap_or(0);
        self.dims.level_to_y(level.max(terrain.water_level()))
    }

    /// Recomputes every rim and mesh; needed after a flood.
    pub fn rebuild_all(&mut self, terrain: &Terrain) {
        for side in WallSide::ALL {
            for i in 0..side.len(&self.dims) {
                let y = self.rim_y(side.point(i, &self.dims), terrain);
                self.rims[side.index()][i] = y;
            }
            self.rebuild_mesh(side);
        }
        log::debug!(target: "walls", "rebuilt all walls");
    }

    /// Updates the rim under a perimeter point and rebuilds only the wall(s) it
    /// sits on. Returns the rebuilt sides; empty for interior points.
    pub fn modify_at_point(&mut self, p: GridPoint, terrain: &Terrain) -> Vec<WallSide> {
        let sides = self.set_rim(p, terrain);
        for &side in &sides {
            self.rebuild_mesh(side);
        }
        sides
    }

    /// Batched form of [`modify_at_point`](Self::modify_at_point): each touched
    /// wall is rebuilt once.
    pub fn modify_at_points(&mut self, points: &[GridPoint], terrain: &Terrain) -> Vec<WallSide> {
        let mut dirty = [false; 4];
        for &p in points {
            for side in self.set_rim(p, terrain) {
                dirty[side.index()] = true;
            }
        }
        let sides: Vec<WallSide> = WallSide::ALL
            .into_iter()
            .filter(|s| dirty[s.index()])
            .collect();
        for &side in &sides {
            self.rebuild_mesh(side);
        }
        sides
    }

    fn set_rim(&mut self, p: GridPoint, terrain: &Terrain) -> Vec<WallSide> {
        let y = self.rim_y(p, terrain);
        let mut sides = Vec::with_capacity(2);
        for (side, i) in WallSide::of_point(p, &self.dims) {
            let rim = &mut self.rims[side.index()][i];
            if *rim != y {
                *rim = y;
                sides.push(side);
            }
        }
        sides
    }

    fn rebuild_mesh(&mut self, side: WallSide) {
        let dims = self.dims;
        let rims = &self.rims[side.index()];
        let n = side.normal();
        let rgba = with_alpha(WALL_COLOR, 255);
        let mesh = &mut self.meshes[side.index()];
        mesh.clear_keep_capacity();
        for i in 0..rims.len().saturating_sub(1) {
            let (x0, z0) = side.point(i, &dims).world_xz(&dims);
            let (x1, z1) = side.point(i + 1, &dims).world_xz(&dims);
            mesh.add_quad(
                Vec3::new(x0, self.floor_y, z0),
                Vec3::new(x1, self.floor_y, z1),
                Vec3::new(x1, rims[i + 1], z1),
                Vec3::new(x0, rims[i], z0),
                n,
                rgba,
            );
        }
        self.rebuilds[side.index()] += 1;
    }

    #[inline]
    pub fn rim(&self, side: WallSide, i: usize) -> f32 {
        self.rims[side.index()][i]
    }

    #[inline]
    pub fn rims(&self, side: WallSide) -> &[f32] {
        &self.rims[side.index()]
    }

    #[inline]
    pub fn mesh(&self, side: WallSide) -> &MeshBuild {
        &self.meshes[side.index()]
    }

    /// How many times a wall's mesh has been rebuilt.
    #[inline]
    pub fn rebuild_count(&self, side: WallSide) -> u64 {
        self.rebuilds[side.index()]
    }

    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }
}
