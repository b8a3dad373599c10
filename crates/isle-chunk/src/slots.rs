//! Index mapping from (tile, corner role) to vertex slots in a chunk buffer.
//!
//! Every tile owns 12 vertices: four triangles `(a, b, center)` walking the
//! corners counter-clockwise. A grid point is therefore duplicated in up to
//! 8 slots across the 4 tiles that use it, and a tile center in 4 slots.

use isle_geom::TileCorner;

pub const VERTS_PER_TILE: usize = 12;

/// Corner pairs of the four triangles of a tile; the third vertex is the center.
pub const TILE_TRIANGLES: [(TileCorner, TileCorner); 4] = [
    (TileCorner::BottomLeft, TileCorner::BottomRight),
    (TileCorner::BottomRight, TileCorner::TopRight),
    (TileCorner::TopRight, TileCorner::TopLeft),
    (TileCorner::TopLeft, TileCorner::BottomLeft),
];

/// Slots within a tile holding each corner, indexed by [`TileCorner::index`].
pub const CORNER_SLOTS: [[usize; 2]; 4] = [[0, 10], [1, 3], [4, 6], [7, 9]];

/// Slots within a tile holding the center vertex.
pub const CENTER_SLOTS: [usize; 4] = [2, 5, 8, 11];

/// Precomputed point -> vertex slot lists for one chunk size.
#[derive(Debug)]
pub struct SlotTable {
    tiles_per_chunk: usize,
    point_slots: Vec<Vec<u32>>,
}

impl SlotTable {
    pub fn new(tiles_per_chunk: usize) -> Self {
        let t = tiles_per_chunk;
        let side = t + 1;
        let mut point_slots = vec![Vec::with_capacity(8); side * side];
        for tz in 0..t {
            for tx in 0..t {
                let base = Self::tile_base_for(t, tx, tz);
                for corner in TileCorner::ALL {
                    let (ox, oz) = corner.offset();
                    let (px, pz) = (tx + ox as usize, tz + oz as usize);
                    let list = &mut point_slots[pz * side + px];
                    for slot in CORNER_SLOTS[corner.index()] {
                        list.push((base + slot) as u32);
                    }
                }
            }
        }
        Self {
            tiles_per_chunk,
            point_slots,
        }
    }

    #[inline]
    fn tile_base_for(t: usize, tx: usize, tz: usize) -> usize {
        (tz * t + tx) * VERTS_PER_TILE
    }

    #[inline]
    pub fn tiles_per_chunk(&self) -> usize {
        self.tiles_per_chunk
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.tiles_per_chunk * self.tiles_per_chunk * VERTS_PER_TILE
    }

    #[inline]
    pub fn tile_base(&self, tx: usize, tz: usize) -> usize {
        Self::tile_base_for(self.tiles_per_chunk, tx, tz)
    }

    #[inline]
    pub fn corner_slots(&self, tx: usize, tz: usize, corner: TileCorner) -> [usize; 2] {
        let base = self.tile_base(tx, tz);
        CORNER_SLOTS[corner.index()].map(|s| base + s)
    }

    #[inline]
    pub fn center_slots(&self, tx: usize, tz: usize) -> [usize; 4] {
        let base = self.tile_base(tx, tz);
        CENTER_SLOTS.map(|s| base + s)
    }

    /// Every slot duplicating chunk-local point `(lx, lz)`: 2 at a chunk corner, up to 8 inside.
    #[inline]
    pub fn point_slots(&self, lx: usize, lz: usize) -> &[u32] {
        &self.point_slots[lz * (self.tiles_per_chunk + 1) + lx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_vertex_slot_is_claimed_exactly_once() {
        let table = SlotTable::new(3);
        let mut seen = vec![0u8; table.vertex_count()];
        for lz in 0..=3 {
            for lx in 0..=3 {
                for &s in table.point_slots(lx, lz) {
                    seen[s as usize] += 1;
                }
            }
        }
        for tz in 0..3 {
            for tx in 0..3 {
                for s in table.center_slots(tx, tz) {
                    seen[s] += 1;
                }
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn slot_counts_depend_on_position() {
        let table = SlotTable::new(4);
        assert_eq!(table.point_slots(0, 0).len(), 2);
        assert_eq!(table.point_slots(2, 0).len(), 4);
        assert_eq!(table.point_slots(2, 2).len(), 8);
        assert_eq!(table.point_slots(4, 4).len(), 2);
    }

    #[test]
    fn triangles_reference_their_corner_slots() {
        for (i, (a, b)) in TILE_TRIANGLES.iter().enumerate() {
            assert!(CORNER_SLOTS[a.index()].contains(&(i * 3)));
            assert!(CORNER_SLOTS[b.index()].contains(&(i * 3 + 1)));
            assert_eq!(CENTER_SLOTS[i], i * 3 + 2);
        }
    }
}
