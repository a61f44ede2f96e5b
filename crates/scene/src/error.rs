//! Scene error types.

use thiserror::Error;

/// Errors raised while loading configuration or starting the scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("Failed to write config file: {0}")]
    SerializeConfig(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
