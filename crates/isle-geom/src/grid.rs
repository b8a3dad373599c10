use serde::{Deserialize, Serialize};

use crate::{GridDims, GridRect, Vec3};

/// Offsets of the 8-connected neighborhood, in a fixed order (row-major, bottom row first).
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridError {
    PointOutOfBounds { x: i32, z: i32 },
    TileOutOfBounds { x: i32, z: i32 },
    NonFinitePosition,
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::PointOutOfBounds { x, z } => write!(f, "grid point ({}, {}) out of bounds", x, z),
            GridError::TileOutOfBounds { x, z } => write!(f, "grid tile ({}, {}) out of bounds", x, z),
            GridError::NonFinitePosition => write!(f, "world position is not finite"),
        }
    }
}

impl std::error::Error for GridError {}

/// One lattice intersection of the terrain grid.
///
/// Identity is `(x, z)` only; the height lives in the chunks that share the point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub z: i32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn checked(x: i32, z: i32, dims: &GridDims) -> Result<Self, GridError> {
        if dims.contains_point(x, z) {
            Ok(Self { x, z })
        } else {
            Err(GridError::PointOutOfBounds { x, z })
        }
    }

    /// Nearest grid point to a world position (height ignored).
    pub fn from_world(pos: Vec3, dims: &GridDims) -> Result<Self, GridError> {
        if !pos.x.is_finite() || !pos.z.is_finite() {
            return Err(GridError::NonFinitePosition);
        }
        let x = (pos.x / dims.tile_size).round() as i32;
        let z = (pos.z / dims.tile_size).round() as i32;
        Self::checked(x, z, dims)
    }

    #[inline]
    pub fn world_xz(self, dims: &GridDims) -> (f32, f32) {
        (self.x as f32 * dims.tile_size, self.z as f32 * dims.tile_size)
    }

    /// World position of this point for a given height level.
    #[inline]
    pub fn to_world(self, dims: &GridDims, level: i32) -> Vec3 {
        let (wx, wz) = self.world_xz(dims);
        Vec3::new(wx, dims.level_to_y(level), wz)
    }

    #[inline]
    pub fn in_bounds(self, dims: &GridDims) -> bool {
        dims.contains_point(self.x, self.z)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    #[inline]
    pub fn chebyshev(self, other: GridPoint) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// The up-to-8 in-bounds neighbors, in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self, dims: &GridDims) -> impl Iterator<Item = GridPoint> + use<> {
        let dims = *dims;
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dz)| self.offset(dx, dz))
            .filter(move |p| p.in_bounds(&dims))
    }

    /// Chunks containing this point: 1 inside a chunk, 2 on a chunk edge, up to 4 on a corner.
    pub fn chunks(self, dims: &GridDims) -> impl Iterator<Item = ChunkCoord> + use<> {
        let xs = axis_chunks(self.x, dims.tiles_per_chunk, dims.chunks_x);
        let zs = axis_chunks(self.z, dims.tiles_per_chunk, dims.chunks_z);
        zs.into_iter()
            .flatten()
            .flat_map(move |cz| xs.into_iter().flatten().map(move |cx| ChunkCoord::new(cx, cz)))
    }

    /// Chunk-local point coordinates inside `chunk`, if the chunk contains this point.
    #[inline]
    pub fn local_in(self, chunk: ChunkCoord, dims: &GridDims) -> Option<(usize, usize)> {
        let origin = chunk.origin(dims);
        let lx = self.x - origin.x;
        let lz = self.z - origin.z;
        let t = dims.tiles_per_chunk;
        if lx < 0 || lz < 0 || lx > t || lz > t {
            return None;
        }
        Some((lx as usize, lz as usize))
    }

    /// Tiles using this point as a corner, paired with the corner role it plays in each.
    pub fn tiles(self, dims: &GridDims) -> impl Iterator<Item = (GridTile, TileCorner)> + use<> {
        let dims = *dims;
        TileCorner::ALL.into_iter().filter_map(move |corner| {
            let (ox, oz) = corner.offset();
            let tile = GridTile::new(self.x - ox, self.z - oz);
            tile.in_bounds(&dims).then_some((tile, corner))
        })
    }

    #[inline]
    pub fn is_edge(self, dims: &GridDims) -> bool {
        self.x == 0 || self.z == 0 || self.is_last_x(dims) || self.is_last_z(dims)
    }

    #[inline]
    pub fn is_last_x(self, dims: &GridDims) -> bool {
        self.x == dims.tiles_x()
    }

    #[inline]
    pub fn is_last_z(self, dims: &GridDims) -> bool {
        self.z == dims.tiles_z()
    }
}

fn axis_chunks(v: i32, tiles_per_chunk: i32, count: i32) -> [Option<i32>; 2] {
    let c = v / tiles_per_chunk;
    let primary = (c < count).then_some(c);
    let shared = (v % tiles_per_chunk == 0 && c > 0).then_some(c - 1);
    [primary, shared]
}

/// Corner roles of a tile, counter-clockwise from the bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCorner {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl TileCorner {
    pub const ALL: [TileCorner; 4] = [
        TileCorner::BottomLeft,
        TileCorner::BottomRight,
        TileCorner::TopRight,
        TileCorner::TopLeft,
    ];

    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            TileCorner::BottomLeft => (0, 0),
            TileCorner::BottomRight => (1, 0),
            TileCorner::TopRight => (1, 1),
            TileCorner::TopLeft => (0, 1),
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Unit cell identified by its bottom-left point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridTile {
    pub x: i32,
    pub z: i32,
}

impl GridTile {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn checked(x: i32, z: i32, dims: &GridDims) -> Result<Self, GridError> {
        if dims.contains_tile(x, z) {
            Ok(Self { x, z })
        } else {
            Err(GridError::TileOutOfBounds { x, z })
        }
    }

    /// Tile whose footprint contains a world position.
    pub fn containing(pos: Vec3, dims: &GridDims) -> Result<Self, GridError> {
        if !pos.x.is_finite() || !pos.z.is_finite() {
            return Err(GridError::NonFinitePosition);
        }
        let x = (pos.x / dims.tile_size).floor() as i32;
        let z = (pos.z / dims.tile_size).floor() as i32;
        Self::checked(x, z, dims)
    }

    #[inline]
    pub fn in_bounds(self, dims: &GridDims) -> bool {
        dims.contains_tile(self.x, self.z)
    }

    #[inline]
    pub fn corner(self, corner: TileCorner) -> GridPoint {
        let (ox, oz) = corner.offset();
        GridPoint::new(self.x + ox, self.z + oz)
    }

    /// Corner points in [`TileCorner::ALL`] order.
    #[inline]
    pub fn corners(self) -> [GridPoint; 4] {
        TileCorner::ALL.map(|c| self.corner(c))
    }

    /// World position of the tile center, given the center height in half-steps.
    #[inline]
    pub fn center_world(self, dims: &GridDims, center_half_steps: i32) -> Vec3 {
        Vec3::new(
            (self.x as f32 + 0.5) * dims.tile_size,
            center_half_steps as f32 * dims.step_height * 0.5,
            (self.z as f32 + 0.5) * dims.tile_size,
        )
    }

    #[inline]
    pub fn chunk(self, dims: &GridDims) -> ChunkCoord {
        ChunkCoord::new(self.x / dims.tiles_per_chunk, self.z / dims.tiles_per_chunk)
    }

    /// Chunk-local tile coordinates within [`chunk`](Self::chunk).
    #[inline]
    pub fn local(self, dims: &GridDims) -> (usize, usize) {
        (
            (self.x % dims.tiles_per_chunk) as usize,
            (self.z % dims.tiles_per_chunk) as usize,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Bottom-left grid point of the chunk.
    #[inline]
    pub fn origin(self, dims: &GridDims) -> GridPoint {
        GridPoint::new(self.cx * dims.tiles_per_chunk, self.cz * dims.tiles_per_chunk)
    }

    /// Row-major index into a dense chunk array.
    #[inline]
    pub fn index(self, dims: &GridDims) -> usize {
        (self.cz * dims.chunks_x + self.cx) as usize
    }

    /// All grid points owned by this chunk, shared edges included.
    #[inline]
    pub fn point_rect(self, dims: &GridDims) -> GridRect {
        let o = self.origin(dims);
        GridRect::new(o, o.offset(dims.tiles_per_chunk, dims.tiles_per_chunk))
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}
