//! Chunk vertex buffers with shared-point height primitives and tile occupancy.
#![forbid(unsafe_code)]

pub mod slots;

use std::sync::Arc;

use isle_geom::{ChunkCoord, GridDims, GridPoint, GridTile, TileCorner};
use isle_world::Heightfield;

pub use slots::{SlotTable, TILE_TRIANGLES, VERTS_PER_TILE};

/// What sits on a tile. Terrain code only stores it; policy lives with the structure hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    pub id: u32,
    pub kind: OccupantKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupantKind {
    Rock,
    Tree,
    Settlement,
    Field,
    Other(u16),
}

/// One chunk of the terrain surface.
///
/// Vertex heights are only written through [`set_point_level`](Self::set_point_level)
/// and [`set_center_half_steps`](Self::set_center_half_steps), which update every
/// duplicate of a point or center together.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    dims: GridDims,
    slots: Arc<SlotTable>,
    positions: Vec<[f32; 3]>,
    occupancy: Vec<Option<Occupant>>,
    pub visible: bool,
}

impl ChunkMesh {
    /// Builds the chunk from a generated heightfield; boundary points are taken
    /// verbatim from the field, so neighboring chunks agree on them.
    pub fn from_heightfield(coord: ChunkCoord, slots: Arc<SlotTable>, field: &Heightfield) -> Self {
        let dims = field.dims;
        let t = dims.tiles_per_chunk as usize;
        let origin = coord.origin(&dims);
        let mut positions = vec![[0.0f32; 3]; slots.vertex_count()];
        for tz in 0..t {
            for tx in 0..t {
                let tile = GridTile::new(origin.x + tx as i32, origin.z + tz as i32);
                for corner in TileCorner::ALL {
                    let p = tile.corner(corner);
                    let w = p.to_world(&dims, field.get(p));
                    for s in slots.corner_slots(tx, tz, corner) {
                        positions[s] = [w.x, w.y, w.z];
                    }
                }
                let c = tile.center_world(&dims, 0);
                for s in slots.center_slots(tx, tz) {
                    positions[s] = [c.x, 0.0, c.z];
                }
            }
        }
        let mut chunk = Self {
            coord,
            dims,
            slots,
            positions,
            occupancy: vec![None; t * t],
            visible: true,
        };
        for tz in 0..t {
            for tx in 0..t {
                chunk.recompute_tile_center(tx, tz);
            }
        }
        chunk
    }

    #[inline]
    pub fn dims(&self) -> &GridDims {
        &self.dims
    }

    #[inline]
    pub fn tiles_per_chunk(&self) -> usize {
        self.dims.tiles_per_chunk as usize
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Chunk-local coordinates of a global point, if this chunk contains it.
    #[inline]
    pub fn local_point(&self, p: GridPoint) -> Option<(usize, usize)> {
        p.local_in(self.coord, &self.dims)
    }

    /// Height level of chunk-local point `(lx, lz)`, read from one representative vertex.
    #[inline]
    pub fn point_level(&self, lx: usize, lz: usize) -> i32 {
        let slot = self.slots.point_slots(lx, lz)[0] as usize;
        self.dims.y_to_level(self.positions[slot][1])
    }

    /// Writes a level to every duplicate vertex of chunk-local point `(lx, lz)`.
    /// Returns whether the height changed.
    pub fn set_point_level(&mut self, lx: usize, lz: usize, level: i32) -> bool {
        let level = self.dims.clamp_level(level);
        if self.point_level(lx, lz) == level {
            return false;
        }
        let y = self.dims.level_to_y(level);
        for &s in self.slots.point_slots(lx, lz) {
            self.positions[s as usize][1] = y;
        }
        true
    }

    /// Tile center height in half-steps.
    #[inline]
    pub fn center_half_steps(&self, tx: usize, tz: usize) -> i32 {
        let slot = self.slots.center_slots(tx, tz)[0];
        (self.positions[slot][1] / (self.dims.step_height * 0.5)).round() as i32
    }

    pub fn set_center_half_steps(&mut self, tx: usize, tz: usize, half_steps: i32) {
        let y = half_steps as f32 * self.dims.step_height * 0.5;
        for s in self.slots.center_slots(tx, tz) {
            self.positions[s][1] = y;
        }
    }

    /// Corner levels in [`TileCorner::ALL`] order.
    #[inline]
    pub fn corner_levels(&self, tx: usize, tz: usize) -> [i32; 4] {
        TileCorner::ALL.map(|corner| {
            let (ox, oz) = corner.offset();
            self.point_level(tx + ox as usize, tz + oz as usize)
        })
    }

    /// All four corners share one level, and that level is above the water.
    pub fn is_tile_flat(&self, tx: usize, tz: usize, water_level: i32) -> bool {
        let [bl, br, tr, tl] = self.corner_levels(tx, tz);
        bl == br && bl == tr && bl == tl && bl > water_level
    }

    /// Center = highest corner for a plain quad (opposite corners pairwise equal),
    /// otherwise lowest corner plus half a step, which tents mixed tiles.
    pub fn recompute_tile_center(&mut self, tx: usize, tz: usize) {
        let [bl, br, tr, tl] = self.corner_levels(tx, tz);
        let lo = bl.min(br).min(tr).min(tl);
        let hi = bl.max(br).max(tr).max(tl);
        let half_steps = if bl == tr && br == tl { hi * 2 } else { lo * 2 + 1 };
        self.set_center_half_steps(tx, tz, half_steps);
    }

    #[inline]
    pub fn occupancy(&self, tx: usize, tz: usize) -> Option<Occupant> {
        self.occupancy[tz * self.tiles_per_chunk() + tx]
    }

    pub fn set_occupancy(&mut self, tx: usize, tz: usize, occupant: Option<Occupant>) {
        let t = self.tiles_per_chunk();
        self.occupancy[tz * t + tx] = occupant;
    }

    /// Vertex indices of triangle `i` (0..4) of local tile `(tx, tz)`.
    #[inline]
    pub fn tile_triangle(&self, tx: usize, tz: usize, i: usize) -> [usize; 3] {
        let base = self.slots.tile_base(tx, tz) + i * 3;
        [base, base + 1, base + 2]
    }

    /// True when every duplicate vertex of every point and center agrees.
    pub fn duplicates_consistent(&self) -> bool {
        let t = self.tiles_per_chunk();
        for lz in 0..=t {
            for lx in 0..=t {
                let slots = self.slots.point_slots(lx, lz);
                let y0 = self.positions[slots[0] as usize][1];
                if slots.iter().any(|&s| self.positions[s as usize][1] != y0) {
                    return false;
                }
            }
        }
        for tz in 0..t {
            for tx in 0..t {
                let [a, b, c, d] = self.slots.center_slots(tx, tz);
                let y0 = self.positions[a][1];
                if [b, c, d].iter().any(|&s| self.positions[s][1] != y0) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> GridDims {
        GridDims {
            tiles_per_chunk: 4,
            chunks_x: 1,
            chunks_z: 1,
            ..GridDims::default()
        }
    }

    fn flat_chunk(level: i32) -> ChunkMesh {
        let d = dims();
        let field = Heightfield::flat(d, level);
        ChunkMesh::from_heightfield(ChunkCoord::new(0, 0), Arc::new(SlotTable::new(4)), &field)
    }

    #[test]
    fn set_point_level_writes_every_duplicate() {
        let mut chunk = flat_chunk(2);
        assert!(chunk.set_point_level(2, 2, 3));
        assert_eq!(chunk.point_level(2, 2), 3);
        assert!(chunk.duplicates_consistent());
        assert!(!chunk.set_point_level(2, 2, 3));
    }

    #[test]
    fn set_point_level_clamps_to_bounds() {
        let mut chunk = flat_chunk(0);
        assert!(!chunk.set_point_level(1, 1, -3));
        chunk.set_point_level(1, 1, 99);
        assert_eq!(chunk.point_level(1, 1), dims().max_level);
    }

    #[test]
    fn tile_center_tents_mixed_tiles() {
        let mut chunk = flat_chunk(2);
        assert_eq!(chunk.center_half_steps(0, 0), 4);
        chunk.set_point_level(1, 1, 3);
        chunk.recompute_tile_center(0, 0);
        // bl=2, br=2, tr=3, tl=2: not a plain quad -> min + half
        assert_eq!(chunk.center_half_steps(0, 0), 5);
        chunk.set_point_level(0, 0, 3);
        chunk.recompute_tile_center(0, 0);
        // saddle: opposite corners equal -> max
        assert_eq!(chunk.center_half_steps(0, 0), 6);
        assert!(chunk.duplicates_consistent());
    }

    #[test]
    fn flatness_requires_dry_equal_corners() {
        let mut chunk = flat_chunk(1);
        assert!(chunk.is_tile_flat(0, 0, 0));
        assert!(!chunk.is_tile_flat(0, 0, 1));
        chunk.set_point_level(1, 0, 2);
        assert!(!chunk.is_tile_flat(0, 0, 0));
    }

    #[test]
    fn occupancy_roundtrip() {
        let mut chunk = flat_chunk(1);
        let rock = Occupant {
            id: 7,
            kind: OccupantKind::Rock,
        };
        assert_eq!(chunk.occupancy(3, 1), None);
        chunk.set_occupancy(3, 1, Some(rock));
        assert_eq!(chunk.occupancy(3, 1), Some(rock));
        chunk.set_occupancy(3, 1, None);
        assert_eq!(chunk.occupancy(3, 1), None);
    }
}
