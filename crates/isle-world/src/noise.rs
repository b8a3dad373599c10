use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::worldgen::WorldGenParams;

/// Range of the per-octave sampling offsets drawn from the seed.
const OCTAVE_OFFSET_RANGE: f32 = 10_000.0;

/// Multi-octave value noise with a radial falloff, producing an island in `[0, 1]`.
///
/// Fully determined by the seed and parameters; sampling never mutates state.
pub struct IslandNoise {
    value: FastNoiseLite,
    offsets: Vec<(f32, f32)>,
    scale: f32,
    persistence: f32,
    lacunarity: f32,
    falloff: Option<(f32, f32)>,
    center: (f32, f32),
    half_extent: (f32, f32),
}

impl IslandNoise {
    pub fn setup(seed: u64, params: &WorldGenParams) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let offsets = (0..params.octaves.max(0))
            .map(|_| {
                let ox = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
                let oz = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
                (ox, oz)
            })
            .collect();
        let mut value = FastNoiseLite::with_seed(seed as i32);
        value.set_noise_type(Some(NoiseType::Value));
        value.set_frequency(Some(1.0));
        let (ex, ez) = params.dims.world_extent();
        Self {
            value,
            offsets,
            scale: params.noise_scale,
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            falloff: params
                .falloff_enable
                .then_some((params.falloff_a, params.falloff_b)),
            center: (ex * params.center_x, ez * params.center_z),
            half_extent: (ex * 0.5, ez * 0.5),
        }
    }

    #[inline]
    pub fn octave_offsets(&self) -> &[(f32, f32)] {
        &self.offsets
    }

    /// Normalized fractal value noise at a world position, before falloff.
    pub fn fractal(&self, wx: f32, wz: f32) -> f32 {
        let mut amplitude = 1.0f32;
        let mut frequency = 1.0f32;
        let mut total = 0.0f32;
        let mut amp_sum = 0.0f32;
        for &(ox, oz) in &self.offsets {
            let sx = wx / self.scale * frequency + ox;
            let sz = wz / self.scale * frequency + oz;
            let n = self.value.get_noise_2d(sx, sz) * 0.5 + 0.5;
            total += n * amplitude;
            amp_sum += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }
        if amp_sum > 0.0 { total / amp_sum } else { 0.0 }
    }

    /// Falloff term at a world position: 0 at the landmass center, 1 at the terrain edge.
    pub fn falloff_at(&self, wx: f32, wz: f32) -> f32 {
        let Some((a, b)) = self.falloff else {
            return 0.0;
        };
        let tx = ((wx - self.center.0) / self.half_extent.0).abs();
        let tz = ((wz - self.center.1) / self.half_extent.1).abs();
        falloff_curve(tx.max(tz).clamp(0.0, 1.0), a, b)
    }

    /// Island height sample in `[0, 1]`.
    #[inline]
    pub fn sample(&self, wx: f32, wz: f32) -> f32 {
        (self.fractal(wx, wz) - self.falloff_at(wx, wz)).clamp(0.0, 1.0)
    }
}

/// `t^a / (t^a + (b - b*t)^a)`: flat near 0, steep towards 1.
#[inline]
pub fn falloff_curve(t: f32, a: f32, b: f32) -> f32 {
    let ta = t.powf(a);
    let denom = ta + (b - b * t).powf(a);
    if denom > 0.0 { ta / denom } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_depend_only_on_seed() {
        let params = WorldGenParams::default();
        let a = IslandNoise::setup(42, &params);
        let b = IslandNoise::setup(42, &params);
        let c = IslandNoise::setup(43, &params);
        assert_eq!(a.octave_offsets(), b.octave_offsets());
        assert_ne!(a.octave_offsets(), c.octave_offsets());
        assert_eq!(a.octave_offsets().len(), params.octaves as usize);
    }

    #[test]
    fn falloff_curve_endpoints() {
        assert_eq!(falloff_curve(0.0, 3.0, 2.2), 0.0);
        assert!((falloff_curve(1.0, 3.0, 2.2) - 1.0).abs() < 1e-6);
        assert!(falloff_curve(0.3, 3.0, 2.2) < falloff_curve(0.7, 3.0, 2.2));
    }

    #[test]
    fn edges_sink_to_zero() {
        let params = WorldGenParams::default();
        let noise = IslandNoise::setup(7, &params);
        let (ex, ez) = params.dims.world_extent();
        assert_eq!(noise.sample(0.0, 0.0), 0.0);
        assert_eq!(noise.sample(ex, ez * 0.5), 0.0);
        for i in 0..64 {
            let s = noise.sample(i as f32 * 0.9, i as f32 * 0.7);
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
