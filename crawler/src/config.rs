//! Locomotion configuration.
//!
//! A [`LocomotionConfig`] is fixed when the controller is built. The only runtime change
//! is an explicit configuration update (speed presets), which goes through the same
//! validation as construction.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_ALIGN_RESPONSIVENESS, DEFAULT_ANGULAR_SPEED, DEFAULT_HYSTERESIS_DEGREES,
        DEFAULT_LINEAR_SPEED, DEFAULT_MAGNET_FORCE, DEFAULT_MESH_OFFSET_DEGREES, SPEED_PRESETS,
    },
    error::{ConfigError, Result},
    types::Quat,
};

/// What the controller does with the tracked normal once the robot touches nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactLossPolicy {
    /// Keep the last committed normal. The robot stays aligned to the surface it left.
    #[default]
    Retain,
    /// Fall back to world-up, as a free-falling robot would.
    RevertToWorldUp,
}

/// Tunables for the surface-locomotion controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Speed along the surface at full translate input (m/s).
    pub linear_speed: f32,
    /// Yaw rate at full rotate input (deg/s).
    pub angular_speed: f32,
    /// Magnet hold-down acceleration along `-normal` (m/s^2).
    pub magnet_force: f32,
    /// Slerp rate of the body rotation toward the target rotation (1/s).
    pub align_responsiveness: f32,
    /// Hysteresis gate of the surface tracker (degrees).
    pub hysteresis_degrees: f32,
    /// Rest-pose correction of the visual asset, Euler angles `[x, y, z]` (degrees).
    ///
    /// Composed with nalgebra's convention: X is applied first, then Y, then Z
    /// (`R = Rz * Ry * Rx`). Engines that apply Z, then X, then Y give the same result
    /// only when a single axis is non-zero, as in the default.
    pub mesh_offset_degrees: [f32; 3],
    /// Behavior once every contact is gone.
    pub contact_loss: ContactLossPolicy,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            linear_speed: DEFAULT_LINEAR_SPEED,
            angular_speed: DEFAULT_ANGULAR_SPEED,
            magnet_force: DEFAULT_MAGNET_FORCE,
            align_responsiveness: DEFAULT_ALIGN_RESPONSIVENESS,
            hysteresis_degrees: DEFAULT_HYSTERESIS_DEGREES,
            mesh_offset_degrees: DEFAULT_MESH_OFFSET_DEGREES,
            contact_loss: ContactLossPolicy::default(),
        }
    }
}

impl LocomotionConfig {
    /// Check every tunable. Called by the controller constructor.
    pub fn validate(&self) -> Result<()> {
        positive("linear_speed", self.linear_speed)?;
        positive("angular_speed", self.angular_speed)?;
        positive("magnet_force", self.magnet_force)?;
        positive("align_responsiveness", self.align_responsiveness)?;

        finite("hysteresis_degrees", self.hysteresis_degrees)?;
        if !(0.0..180.0).contains(&self.hysteresis_degrees) {
            return Err(ConfigError::HysteresisOutOfRange(self.hysteresis_degrees));
        }

        for value in self.mesh_offset_degrees {
            finite("mesh_offset_degrees", value)?;
        }

        Ok(())
    }

    /// Hysteresis threshold in radians.
    #[inline]
    pub fn hysteresis_radians(&self) -> f32 {
        self.hysteresis_degrees.to_radians()
    }

    /// The constant mesh-alignment rotation (X, then Y, then Z).
    pub fn mesh_offset(&self) -> Quat {
        let [x, y, z] = self.mesh_offset_degrees;
        Quat::from_euler_angles(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// A copy with `linear_speed` taken from a preset slot.
    pub fn with_speed_preset(&self, preset: SpeedPreset) -> Self {
        Self {
            linear_speed: preset.speed(),
            ..self.clone()
        }
    }
}

/// One of the five selectable linear speeds, identified by a 1-based slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedPreset(u8);

impl SpeedPreset {
    pub fn from_slot(slot: u8) -> Result<Self> {
        if (1..=SPEED_PRESETS.len() as u8).contains(&slot) {
            Ok(Self(slot))
        } else {
            Err(ConfigError::UnknownSpeedPreset(slot))
        }
    }

    #[inline]
    pub fn slot(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        SPEED_PRESETS[(self.0 - 1) as usize]
    }
}

/// The fastest preset speed; telemetry normalizes motor figures against it.
pub fn max_move_speed() -> f32 {
    SPEED_PRESETS.iter().copied().fold(0.0, f32::max)
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
