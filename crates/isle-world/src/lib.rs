//! World sizing, island noise and heightfield generation.
#![forbid(unsafe_code)]

mod heightfield;
pub mod noise;
mod world;
pub mod worldgen;

pub use heightfield::Heightfield;
pub use noise::IslandNoise;
pub use world::World;
pub use worldgen::{ConfigError, WorldGenConfig, WorldGenParams, load_params_from_path, load_params_from_str};
