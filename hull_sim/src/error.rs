//! Error types for the simulation host.

use std::path::PathBuf;

use crawler::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("`sim.{field}` is invalid: {reason}")]
    Settings {
        field: &'static str,
        reason: &'static str,
    },

    #[error("robot body is missing from the physics world")]
    RobotMissing,
}

pub type Result<T> = std::result::Result<T, SimError>;
