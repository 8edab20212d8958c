//! Simulation configuration loaded from TOML.
//!
//! ```toml
//! [sim]
//! dt = 0.02
//! ticks = 1500
//!
//! [locomotion]
//! linear_speed = 5.0
//! contact_loss = "retain"
//! ```
//!
//! Every key is optional. A missing file falls back to the defaults with a warning; a file
//! that exists but does not parse is an error.

use std::path::Path;

use crawler::{LocomotionConfig, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub sim: SimSettings,
    pub locomotion: LocomotionConfig,
}

/// Host-side settings: timestep, world and robot geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Fixed physics timestep (seconds).
    pub dt: f32,
    /// Ticks the binary runs before exiting.
    pub ticks: u64,
    /// World gravity (m/s^2).
    pub gravity: [f32; 3],
    /// Half-extents of the robot's box collider (meters).
    pub robot_half_extents: [f32; 3],
    /// Height of the robot's center above the floor at spawn (meters).
    pub spawn_height: f32,
    /// Inner half-extents of the demo compartment (meters).
    pub compartment_half_extents: [f32; 3],
    /// Log a telemetry frame every this many ticks. Zero disables it.
    pub telemetry_interval: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            dt: 1.0 / 50.0,
            ticks: 1500,
            gravity: [0.0, -9.81, 0.0],
            robot_half_extents: [0.4, 0.15, 0.5],
            spawn_height: 0.2,
            compartment_half_extents: [6.0, 3.0, 6.0],
            telemetry_interval: 50,
        }
    }
}

impl SimSettings {
    pub fn gravity(&self) -> Vec3 {
        Vec3::from(self.gravity)
    }

    pub fn robot_half_extents(&self) -> Vec3 {
        Vec3::from(self.robot_half_extents)
    }

    pub fn compartment_half_extents(&self) -> Vec3 {
        Vec3::from(self.compartment_half_extents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::Settings {
                field: "dt",
                reason: "must be a positive number of seconds",
            });
        }
        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(SimError::Settings {
                field: "gravity",
                reason: "must be finite",
            });
        }
        if !self.robot_half_extents.iter().all(|c| c.is_finite() && *c > 0.0) {
            return Err(SimError::Settings {
                field: "robot_half_extents",
                reason: "must be positive",
            });
        }
        if !self
            .compartment_half_extents
            .iter()
            .zip(self.robot_half_extents)
            .all(|(room, robot)| room.is_finite() && *room > robot)
        {
            return Err(SimError::Settings {
                field: "compartment_half_extents",
                reason: "must be larger than the robot",
            });
        }
        if !self.spawn_height.is_finite() {
            return Err(SimError::Settings {
                field: "spawn_height",
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

impl SimConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let config: SimConfig = toml::from_str(text).map_err(|source| SimError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml_str(&text, path)?;
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("{} not found, using default configuration", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(SimError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.sim.validate()?;
        self.locomotion.validate()?;
        Ok(())
    }
}
