//! Deterministic terrain hashing for desync detection.

use std::hash::Hasher;

use isle_edit::Terrain;
use isle_geom::GridRect;

/// FNV-1a; platform- and run-independent, unlike `DefaultHasher`.
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    pub fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

/// Hash of the water level followed by every point level in row-major order.
pub fn terrain_hash(terrain: &Terrain) -> u64 {
    let mut h = Fnv1aHasher::new();
    h.write(&terrain.water_level().to_le_bytes());
    for p in GridRect::full(terrain.dims()).points() {
        h.write(&terrain.point_level(p).unwrap_or(-1).to_le_bytes());
    }
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vectors() {
        let h = Fnv1aHasher::new();
        assert_eq!(h.finish(), 0xcbf29ce484222325);
        let mut h = Fnv1aHasher::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn terrain_hash_is_little_endian() {
        use isle_geom::GridDims;
        use isle_world::{Heightfield, World, WorldGenParams};

        let dims = GridDims {
            tiles_per_chunk: 1,
            chunks_x: 1,
            chunks_z: 1,
            max_level: 4,
            ..GridDims::default()
        };
        let mut params = WorldGenParams::default().with_dims(dims);
        params.initial_water_level = 1;
        let world = World::new(1, params);
        let terrain = Terrain::from_heightfield(&world, &Heightfield::flat(dims, 2));
        let mut bytes = vec![1, 0, 0, 0];
        for _ in 0..4 {
            bytes.extend_from_slice(&[2, 0, 0, 0]);
        }
        let mut h = Fnv1aHasher::new();
        h.write(&bytes);
        assert_eq!(terrain_hash(&terrain), h.finish());
    }
}
