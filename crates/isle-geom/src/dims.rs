use serde::{Deserialize, Serialize};

use crate::{GridPoint, Vec3};

/// Fixed sizing of one terrain, chosen at world creation and never changed.
///
/// Heights are expressed in integer levels: world Y is `level * step_height`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridDims {
    pub tiles_per_chunk: i32,
    pub chunks_x: i32,
    pub chunks_z: i32,
    pub tile_size: f32,
    pub step_height: f32,
    pub max_level: i32,
}

impl GridDims {
    #[inline]
    pub fn tiles_x(&self) -> i32 {
        self.tiles_per_chunk * self.chunks_x
    }

    #[inline]
    pub fn tiles_z(&self) -> i32 {
        self.tiles_per_chunk * self.chunks_z
    }

    #[inline]
    pub fn points_x(&self) -> i32 {
        self.tiles_x() + 1
    }

    #[inline]
    pub fn points_z(&self) -> i32 {
        self.tiles_z() + 1
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        (self.points_x() * self.points_z()) as usize
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        (self.chunks_x * self.chunks_z) as usize
    }

    #[inline]
    pub fn contains_point(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x <= self.tiles_x() && z <= self.tiles_z()
    }

    #[inline]
    pub fn contains_tile(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.tiles_x() && z < self.tiles_z()
    }

    #[inline]
    pub fn contains_chunk(&self, cx: i32, cz: i32) -> bool {
        cx >= 0 && cz >= 0 && cx < self.chunks_x && cz < self.chunks_z
    }

    /// Row-major index of a grid point into a dense `(points_x * points_z)` array.
    #[inline]
    pub fn point_index(&self, p: GridPoint) -> usize {
        (p.z * self.points_x() + p.x) as usize
    }

    #[inline]
    pub fn level_to_y(&self, level: i32) -> f32 {
        level as f32 * self.step_height
    }

    /// Inverse of [`level_to_y`](Self::level_to_y); exact for values written by it.
    #[inline]
    pub fn y_to_level(&self, y: f32) -> i32 {
        (y / self.step_height).round() as i32
    }

    #[inline]
    pub fn clamp_level(&self, level: i32) -> i32 {
        level.clamp(0, self.max_level)
    }

    /// World-space extent of the terrain along X and Z.
    #[inline]
    pub fn world_extent(&self) -> (f32, f32) {
        (
            self.tiles_x() as f32 * self.tile_size,
            self.tiles_z() as f32 * self.tile_size,
        )
    }

    /// World-space center of the terrain at height zero.
    #[inline]
    pub fn world_center(&self) -> Vec3 {
        let (ex, ez) = self.world_extent();
        Vec3::new(ex * 0.5, 0.0, ez * 0.5)
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self {
            tiles_per_chunk: 16,
            chunks_x: 4,
            chunks_z: 4,
            tile_size: 1.0,
            step_height: 0.5,
            max_level: 16,
        }
    }
}
