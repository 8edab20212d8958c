//! Error types for the locomotion core.

use thiserror::Error;

/// Rejected locomotion configuration.
///
/// Raised at construction or when a configuration update is applied; a running tick
/// never produces one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("hysteresis must be within [0, 180) degrees, got {0}")]
    HysteresisOutOfRange(f32),

    #[error(
        "speed preset slot {0} does not exist (valid slots: 1..={max})",
        max = crate::constants::SPEED_PRESETS.len()
    )]
    UnknownSpeedPreset(u8),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
