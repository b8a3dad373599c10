use isle_geom::GridDims;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub dims: Dims,
    #[serde(default)]
    pub noise: Noise,
    #[serde(default)]
    pub falloff: Falloff,
    #[serde(default)]
    pub water: Water,
    #[serde(default)]
    pub walls: Walls,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dims {
    #[serde(default = "default_tiles_per_chunk")]
    pub tiles_per_chunk: i32,
    #[serde(default = "default_chunks")]
    pub chunks_x: i32,
    #[serde(default = "default_chunks")]
    pub chunks_z: i32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default = "default_step_height")]
    pub step_height: f32,
    #[serde(default = "default_max_level")]
    pub max_level: i32,
}
fn default_tiles_per_chunk() -> i32 {
    16
}
fn default_chunks() -> i32 {
    4
}
fn default_tile_size() -> f32 {
    1.0
}
fn default_step_height() -> f32 {
    0.5
}
fn default_max_level() -> i32 {
    16
}
impl Default for Dims {
    fn default() -> Self {
        Self {
            tiles_per_chunk: default_tiles_per_chunk(),
            chunks_x: default_chunks(),
            chunks_z: default_chunks(),
            tile_size: default_tile_size(),
            step_height: default_step_height(),
            max_level: default_max_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Noise {
    #[serde(default = "d_scale")]
    pub scale: f32,
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
}
fn d_scale() -> f32 {
    24.0
}
fn d_oct() -> i32 {
    4
}
fn d_pers() -> f32 {
    0.5
}
fn d_lac() -> f32 {
    2.0
}
impl Default for Noise {
    fn default() -> Self {
        Self {
            scale: d_scale(),
            octaves: d_oct(),
            persistence: d_pers(),
            lacunarity: d_lac(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Falloff {
    #[serde(default = "default_falloff_enable")]
    pub enable: bool,
    #[serde(default = "default_falloff_a")]
    pub a: f32,
    #[serde(default = "default_falloff_b")]
    pub b: f32,
    /// Landmass center as a fraction of the terrain extent.
    #[serde(default = "default_center")]
    pub center_x: f32,
    #[serde(default = "default_center")]
    pub center_z: f32,
}
fn default_falloff_enable() -> bool {
    true
}
fn default_falloff_a() -> f32 {
    3.0
}
fn default_falloff_b() -> f32 {
    2.2
}
fn default_center() -> f32 {
    0.5
}
impl Default for Falloff {
    fn default() -> Self {
        Self {
            enable: default_falloff_enable(),
            a: default_falloff_a(),
            b: default_falloff_b(),
            center_x: default_center(),
            center_z: default_center(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Water {
    #[serde(default)]
    pub initial_level: i32,
    /// Defaults to `dims.max_level` when omitted.
    #[serde(default)]
    pub max_level: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Walls {
    #[serde(default = "default_wall_floor")]
    pub floor_y: f32,
}
fn default_wall_floor() -> f32 {
    -2.0
}
impl Default for Walls {
    fn default() -> Self {
        Self {
            floor_y: default_wall_floor(),
        }
    }
}

/// Flattened, validated world generation parameters.
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub dims: GridDims,
    pub noise_scale: f32,
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub falloff_enable: bool,
    pub falloff_a: f32,
    pub falloff_b: f32,
    pub center_x: f32,
    pub center_z: f32,
    pub initial_water_level: i32,
    pub max_water_level: i32,
    pub wall_floor_y: f32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let dims = GridDims {
            tiles_per_chunk: cfg.dims.tiles_per_chunk,
            chunks_x: cfg.dims.chunks_x,
            chunks_z: cfg.dims.chunks_z,
            tile_size: cfg.dims.tile_size,
            step_height: cfg.dims.step_height,
            max_level: cfg.dims.max_level,
        };
        Self {
            dims,
            noise_scale: cfg.noise.scale,
            octaves: cfg.noise.octaves,
            persistence: cfg.noise.persistence,
            lacunarity: cfg.noise.lacunarity,
            falloff_enable: cfg.falloff.enable,
            falloff_a: cfg.falloff.a,
            falloff_b: cfg.falloff.b,
            center_x: cfg.falloff.center_x,
            center_z: cfg.falloff.center_z,
            initial_water_level: cfg.water.initial_level,
            max_water_level: cfg.water.max_level.unwrap_or(cfg.dims.max_level),
            wall_floor_y: cfg.walls.floor_y,
        }
    }

    /// Same parameters with different sizing; used by tests and small demo worlds.
    pub fn with_dims(mut self, dims: GridDims) -> Self {
        self.max_water_level = self.max_water_level.min(dims.max_level);
        self.dims = dims;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dims;
        if d.tiles_per_chunk <= 0 || d.chunks_x <= 0 || d.chunks_z <= 0 {
            return Err(ConfigError::InvalidDims("chunk size and counts must be positive"));
        }
        if d.tile_size <= 0.0 || d.step_height <= 0.0 {
            return Err(ConfigError::InvalidDims("tile size and step height must be positive"));
        }
        if d.max_level <= 0 {
            return Err(ConfigError::InvalidDims("max level must be positive"));
        }
        if self.noise_scale <= 0.0 || self.octaves <= 0 || self.lacunarity <= 0.0 {
            return Err(ConfigError::InvalidNoise("scale, octaves and lacunarity must be positive"));
        }
        if self.initial_water_level < 0 || self.initial_water_level > self.max_water_level {
            return Err(ConfigError::InvalidWater("initial level must lie in [0, max_level]"));
        }
        if self.max_water_level > d.max_level {
            return Err(ConfigError::InvalidWater("max water level exceeds terrain max level"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    InvalidDims(&'static str),
    InvalidNoise(&'static str),
    InvalidWater(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDims(msg) => write!(f, "invalid dims: {}", msg),
            ConfigError::InvalidNoise(msg) => write!(f, "invalid noise: {}", msg),
            ConfigError::InvalidWater(msg) => write!(f, "invalid water: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_params_from_str(s: &str) -> Result<WorldGenParams, Box<dyn Error>> {
    let cfg: WorldGenConfig = toml::from_str(s)?;
    let params = WorldGenParams::from_config(&cfg);
    params.validate()?;
    Ok(params)
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    load_params_from_str(&s)
}
