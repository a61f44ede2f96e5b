//! Scene configuration.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use spatial::TreeConfig;
use std::path::Path;
use tracing::info;

/// File read by [`Config::load`].
pub const DEFAULT_PATH: &str = "config.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub objects: ObjectConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> Result<Self, SceneError> {
        Self::load_from(Path::new(DEFAULT_PATH))
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self, SceneError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)?
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text. Missing fields take defaults.
    pub fn from_toml(contents: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(contents)?)
    }

    /// Check that sizes are usable and objects fit in the world.
    pub fn validate(&self) -> Result<(), SceneError> {
        fn positive(name: &str, value: f32) -> Result<(), SceneError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SceneError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        }

        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("objects.width", self.objects.width)?;
        positive("objects.height", self.objects.height)?;
        positive("camera.width", self.camera.width)?;
        positive("camera.height", self.camera.height)?;

        if self.objects.speed < 0.0 || !self.objects.speed.is_finite() {
            return Err(SceneError::InvalidConfig(format!(
                "objects.speed must not be negative, got {}",
                self.objects.speed
            )));
        }
        if self.camera.speed < 0.0 || !self.camera.speed.is_finite() {
            return Err(SceneError::InvalidConfig(format!(
                "camera.speed must not be negative, got {}",
                self.camera.speed
            )));
        }
        if self.objects.width > self.world.width || self.objects.height > self.world.height {
            return Err(SceneError::InvalidConfig(format!(
                "objects ({}x{}) do not fit in the world ({}x{})",
                self.objects.width, self.objects.height, self.world.width, self.world.height
            )));
        }
        if self.tree.max_depth > TreeConfig::DEPTH_LIMIT {
            return Err(SceneError::InvalidConfig(format!(
                "tree.max_depth must be at most {}, got {}",
                TreeConfig::DEPTH_LIMIT,
                self.tree.max_depth
            )));
        }
        if self.tree.max_child_count == 0 {
            return Err(SceneError::InvalidConfig(
                "tree.max_child_count must be greater than 0".to_string(),
            ));
        }
        if self.simulation.tick_interval_ms == 0 {
            return Err(SceneError::InvalidConfig(
                "simulation.tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// World bounds, centered on the origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldConfig {
    #[serde(default = "default_world_size")]
    pub width: f32,
    #[serde(default = "default_world_size")]
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_size(),
            height: default_world_size(),
        }
    }
}

fn default_world_size() -> f32 {
    100.0
}

/// Object population.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectConfig {
    /// Moving objects spawned at startup.
    #[serde(default = "default_object_count")]
    pub count: usize,
    /// Objects that never move.
    #[serde(default)]
    pub static_count: usize,
    #[serde(default = "default_object_size")]
    pub width: f32,
    #[serde(default = "default_object_size")]
    pub height: f32,
    /// Interpolation progress per second toward the current target.
    #[serde(default = "default_object_speed")]
    pub speed: f32,
    /// Whether objects move at all.
    #[serde(default = "default_moving")]
    pub moving: bool,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            count: default_object_count(),
            static_count: 0,
            width: default_object_size(),
            height: default_object_size(),
            speed: default_object_speed(),
            moving: default_moving(),
        }
    }
}

fn default_object_count() -> usize {
    200
}
fn default_object_size() -> f32 {
    1.0
}
fn default_object_speed() -> f32 {
    1.0
}
fn default_moving() -> bool {
    true
}

/// Camera viewport that queries the index every tick.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_enabled")]
    pub enabled: bool,
    #[serde(default = "default_camera_size")]
    pub width: f32,
    #[serde(default = "default_camera_size")]
    pub height: f32,
    #[serde(default = "default_camera_speed")]
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            enabled: default_camera_enabled(),
            width: default_camera_size(),
            height: default_camera_size(),
            speed: default_camera_speed(),
        }
    }
}

fn default_camera_enabled() -> bool {
    true
}
fn default_camera_size() -> f32 {
    10.0
}
fn default_camera_speed() -> f32 {
    0.5
}

/// Tick loop settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Tick interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Stop after this many ticks (0 = run until interrupted).
    #[serde(default)]
    pub ticks: u64,
    /// Ticks between stat reports (0 = never).
    #[serde(default = "default_report_every")]
    pub report_every: u64,
    /// RNG seed for reproducible runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            ticks: 0,
            report_every: default_report_every(),
            seed: None,
        }
    }
}

fn default_tick_interval() -> u64 {
    16
}
fn default_report_every() -> u64 {
    60
}
