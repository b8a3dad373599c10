use std::sync::Arc;

use isle_chunk::{ChunkMesh, SlotTable};
use isle_geom::{ChunkCoord, GridDims};
use isle_world::Heightfield;
use proptest::prelude::*;

fn dims(t: i32) -> GridDims {
    GridDims {
        tiles_per_chunk: t,
        chunks_x: 1,
        chunks_z: 1,
        ..GridDims::default()
    }
}

fn writes(t: usize) -> impl Strategy<Value = Vec<(usize, usize, i32)>> {
    prop::collection::vec((0..=t, 0..=t, -2i32..20), 0..40)
}

proptest! {
    // Arbitrary point writes never desynchronize duplicated vertices
    #[test]
    fn writes_keep_duplicates_consistent((t, ops) in (1usize..=6).prop_flat_map(|t| (Just(t), writes(t)))) {
        let d = dims(t as i32);
        let field = Heightfield::flat(d, 3);
        let mut chunk = ChunkMesh::from_heightfield(ChunkCoord::new(0, 0), Arc::new(SlotTable::new(t)), &field);
        for (lx, lz, level) in ops {
            chunk.set_point_level(lx, lz, level);
            prop_assert_eq!(chunk.point_level(lx, lz), level.clamp(0, d.max_level));
            for tz in lz.saturating_sub(1)..lz.min(t - 1) + 1 {
                for tx in lx.saturating_sub(1)..lx.min(t - 1) + 1 {
                    chunk.recompute_tile_center(tx, tz);
                }
            }
        }
        prop_assert!(chunk.duplicates_consistent());
    }

    // Tile centers always sit between the lowest and highest corner
    #[test]
    fn centers_stay_within_corner_range((t, ops) in (1usize..=5).prop_flat_map(|t| (Just(t), writes(t)))) {
        let d = dims(t as i32);
        let field = Heightfield::flat(d, 4);
        let mut chunk = ChunkMesh::from_heightfield(ChunkCoord::new(0, 0), Arc::new(SlotTable::new(t)), &field);
        for (lx, lz, level) in ops {
            chunk.set_point_level(lx, lz, level);
        }
        for tz in 0..t { for tx in 0..t {
            chunk.recompute_tile_center(tx, tz);
            let levels = chunk.corner_levels(tx, tz);
            let lo = *levels.iter().min().unwrap() * 2;
            let hi = *levels.iter().max().unwrap() * 2;
            let c = chunk.center_half_steps(tx, tz);
            prop_assert!(c >= lo && c <= hi.max(lo + 1));
        }}
    }
}
