use std::sync::Arc;
use std::time::Instant;

use isle_geom::GridDims;

use crate::heightfield::Heightfield;
use crate::noise::IslandNoise;
use crate::worldgen::WorldGenParams;

/// Session-wide world description: sizing, seed and generation parameters.
#[derive(Clone, Debug)]
pub struct World {
    pub seed: u64,
    pub params: Arc<WorldGenParams>,
}

impl World {
    pub fn new(seed: u64, params: WorldGenParams) -> Self {
        Self {
            seed,
            params: Arc::new(params),
        }
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.params.dims
    }

    pub fn make_noise(&self) -> IslandNoise {
        IslandNoise::setup(self.seed, &self.params)
    }

    pub fn generate_heightfield(&self) -> Heightfield {
        let start = Instant::now();
        let dims = self.dims();
        let field = Heightfield::generate(&self.make_noise(), dims);
        log::info!(
            target: "terrain",
            "generated {}x{} points seed={} in {}ms",
            dims.points_x(),
            dims.points_z(),
            self.seed,
            start.elapsed().as_millis()
        );
        field
    }
}
