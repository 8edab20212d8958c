/*!
Core data types and math aliases shared by the locomotion modules.

This module intentionally contains no algorithms. It defines the data exchanged
between:
- the physics host (contact samples in, rigid-body writes out)
- the surface tracker (normal estimation)
- the locomotion controller (orientation integration)
- telemetry consumers (read-only snapshots)

Frame conventions
- Right-handed, Y-up world. `WORLD_UP = +Y`, `WORLD_RIGHT = +X`.
- The robot's logical local frame uses `LOCAL_UP = +Y` and `LOCAL_FORWARD = +Z`.
  The visual asset's rest pose may differ; that correction is the mesh offset and is
  applied only when writing the body rotation.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// World-space up.
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// World-space right, the second stable reference for tangent fallbacks.
pub const WORLD_RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// The robot's logical up axis in its local frame.
pub const LOCAL_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// The robot's logical forward axis in its local frame.
pub const LOCAL_FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// One collision contact reported by the physics host for the current tick.
///
/// `normal` points away from the touched surface, towards the robot. Samples are
/// transient: they are consumed by the tracker in the tick they arrive and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactSample {
    /// World-space contact point.
    pub point: Vec3,
    /// World-space surface normal at the contact.
    pub normal: Vec3,
}

impl ContactSample {
    #[inline]
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }
}

/// Per-tick player intent, sampled once per physics tick.
///
/// - `translate.y` drives forward/backward motion along the surface.
/// - `rotate.x` drives yaw about the current surface normal.
///
/// Components are clamped to `[-1, 1]` on construction. The remaining axes
/// (`translate.x`, `rotate.y`) are carried for input devices but unused by the core.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionInput {
    pub translate: Vec2,
    pub rotate: Vec2,
}

impl MotionInput {
    /// Neutral input (no motion, no yaw).
    pub const ZERO: Self = Self {
        translate: Vec2::new(0.0, 0.0),
        rotate: Vec2::new(0.0, 0.0),
    };

    pub fn new(translate: Vec2, rotate: Vec2) -> Self {
        Self {
            translate: clamp_axis(translate),
            rotate: clamp_axis(rotate),
        }
    }

    /// Convenience for the common "drive forward and steer" case.
    pub fn drive(forward: f32, turn: f32) -> Self {
        Self::new(Vec2::new(0.0, forward), Vec2::new(turn, 0.0))
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.translate == Vec2::zeros() && self.rotate == Vec2::zeros()
    }
}

#[inline]
fn clamp_axis(v: Vec2) -> Vec2 {
    let clamp = |c: f32| if c.is_finite() { c.clamp(-1.0, 1.0) } else { 0.0 };
    Vec2::new(clamp(v.x), clamp(v.y))
}
