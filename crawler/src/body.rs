//! Rigid-body write port.
//!
//! The controller never owns the physics body. Each tick it receives a mutable port and
//! issues the same three writes the host integrator understands: a position move, a
//! rotation move and the magnet acceleration.

use crate::types::{Quat, Vec3};

/// What the locomotion tick needs from the physics host's rigid body.
pub trait RigidBodyPort {
    /// Current world-space position.
    fn position(&self) -> Vec3;

    /// Current world-space rotation (including the mesh offset).
    fn rotation(&self) -> Quat;

    /// Move the body to `position` for this step.
    fn move_position(&mut self, position: Vec3);

    /// Rotate the body to `rotation` for this step.
    fn move_rotation(&mut self, rotation: Quat);

    /// Apply a mass-independent acceleration for this step.
    ///
    /// Replaces the acceleration written on the previous tick rather than stacking on it.
    fn apply_acceleration(&mut self, acceleration: Vec3);
}

/// A headless body: just a pose and the last requested acceleration.
///
/// Useful when the controller runs without a physics engine (tools, replays, tests).
/// The acceleration is recorded but not integrated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub acceleration: Vec3,
}

impl PoseBody {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            acceleration: Vec3::zeros(),
        }
    }
}

impl Default for PoseBody {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }
}

impl RigidBodyPort for PoseBody {
    #[inline]
    fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    fn move_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[inline]
    fn move_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    #[inline]
    fn apply_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }
}
