//! Rotation helpers for the locomotion tick.
//!
//! Every function here is pure. The controller owns the orientation state and decides
//! the order in which these are applied.

use nalgebra as na;

use crate::{
    constants::DEGENERATE_TANGENT_SQ,
    types::{LOCAL_FORWARD, LOCAL_UP, Quat, Vec3, WORLD_RIGHT, WORLD_UP},
};

/// Incremental yaw of `degrees` about `normal`, pre-multiplied into `orientation`.
///
/// Pre-multiplying expresses the yaw in the world frame at the current normal, so it
/// always happens in the current tangent plane.
#[inline]
pub fn yaw_about_normal(orientation: Quat, normal: Vec3, degrees: f32) -> Quat {
    let axis = na::Unit::new_normalize(normal);
    let yaw = Quat::from_axis_angle(&axis, degrees.to_radians());
    yaw * orientation
}

/// The rotation that takes the orientation's local up onto `normal`, pre-multiplied.
///
/// Applied every tick, a continuously curving surface produces continuous re-alignment.
/// When local up is exactly opposite the normal the shortest arc is ambiguous; the
/// half-turn is taken about the orientation's own forward axis, which keeps heading.
pub fn align_up_to_normal(orientation: Quat, normal: Vec3) -> Quat {
    let up = orientation * LOCAL_UP;
    let align = Quat::rotation_between(&up, &normal).unwrap_or_else(|| {
        let pivot = perpendicular_axis(up, orientation * LOCAL_FORWARD);
        Quat::from_axis_angle(&na::Unit::new_normalize(pivot), std::f32::consts::PI)
    });
    // Renormalize so rounding cannot accumulate over long runs.
    Quat::new_normalize((align * orientation).into_inner())
}

/// Project the orientation's local forward onto the tangent plane of `normal`.
///
/// Falls back to `normal x WORLD_UP`, then `normal x WORLD_RIGHT`, when forward is
/// (nearly) parallel to the normal. The result is always a unit vector perpendicular
/// to `normal`.
pub fn forward_on_surface(orientation: Quat, normal: Vec3) -> Vec3 {
    let forward = orientation * LOCAL_FORWARD;
    let projected = project_on_plane(forward, normal);
    if projected.norm_squared() >= DEGENERATE_TANGENT_SQ {
        return projected.normalize();
    }
    tangent_fallback(normal)
}

/// A stable unit tangent of `normal` that does not depend on any orientation.
pub fn tangent_fallback(normal: Vec3) -> Vec3 {
    let candidate = normal.cross(&WORLD_UP);
    if candidate.norm_squared() >= DEGENERATE_TANGENT_SQ {
        return candidate.normalize();
    }
    normal.cross(&WORLD_RIGHT).normalize()
}

/// Remove the component of `v` along `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n_sq = normal.norm_squared();
    if n_sq <= f32::EPSILON {
        return v;
    }
    v - normal * (v.dot(&normal) / n_sq)
}

/// Move `current` toward `target` by `clamp01(rate * dt)` of the remaining arc.
///
/// At a fraction of 1 the result is exactly `target`.
pub fn smooth_rotation(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    let t = (rate * dt).clamp(0.0, 1.0);
    if t >= 1.0 {
        return target;
    }
    if t <= 0.0 {
        return current;
    }
    current
        .try_slerp(&target, t, f32::EPSILON)
        .unwrap_or(target)
}

/// Angle (radians) between the orientation's local up and `normal`.
#[inline]
pub fn up_misalignment(orientation: Quat, normal: Vec3) -> f32 {
    (orientation * LOCAL_UP).angle(&normal)
}

/// Any unit vector perpendicular to `v`, preferring `hint` when it qualifies.
fn perpendicular_axis(v: Vec3, hint: Vec3) -> Vec3 {
    let projected = project_on_plane(hint, v);
    if projected.norm_squared() >= DEGENERATE_TANGENT_SQ {
        return projected;
    }
    tangent_fallback(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < EPS
    }

    #[test]
    fn yaw_rotates_forward_within_the_tangent_plane() {
        let q = yaw_about_normal(Quat::identity(), WORLD_UP, 90.0);
        // Right-handed: +90 degrees about +Y takes +Z onto +X.
        assert!(approx(q * LOCAL_FORWARD, Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(q * LOCAL_UP, WORLD_UP));
    }

    #[test]
    fn yaw_uses_the_given_normal_not_world_up() {
        // Robot standing on a wall facing up the wall.
        let wall = Vec3::new(0.0, 0.0, -1.0);
        let on_wall = align_up_to_normal(Quat::identity(), wall);
        let yawed = yaw_about_normal(on_wall, wall, 45.0);

        assert!(approx(yawed * LOCAL_UP, wall));
        let forward = yawed * LOCAL_FORWARD;
        assert!(forward.dot(&wall).abs() < EPS);
    }

    #[test]
    fn align_up_lands_exactly_on_the_normal() {
        let normals = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0).normalize(),
            Vec3::new(0.3, -0.9, 0.1).normalize(),
        ];
        for n in normals {
            let aligned = align_up_to_normal(Quat::identity(), n);
            assert!(approx(aligned * LOCAL_UP, n), "normal {n:?}");
        }
    }

    #[test]
    fn align_up_preserves_heading_for_small_tilts() {
        let yawed = yaw_about_normal(Quat::identity(), WORLD_UP, 30.0);
        let n = Vec3::new(0.0, 1.0, 0.05).normalize();
        let aligned = align_up_to_normal(yawed, n);
        let before = forward_on_surface(yawed, n);
        let after = forward_on_surface(aligned, n);
        assert!(before.dot(&after) > 0.999);
    }

    #[test]
    fn align_up_handles_the_anti_parallel_case() {
        let down = Vec3::new(0.0, -1.0, 0.0);
        let flipped = align_up_to_normal(Quat::identity(), down);
        assert!(approx(flipped * LOCAL_UP, down));
        // The half-turn pivots about forward, so forward is kept.
        assert!(approx(flipped * LOCAL_FORWARD, LOCAL_FORWARD));
    }

    #[test]
    fn forward_on_surface_projects_and_normalizes() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let f = forward_on_surface(Quat::identity(), n);
        assert!((f.norm() - 1.0).abs() < EPS);
        assert!(f.dot(&n).abs() < EPS);
        assert!(f.z > 0.0);
    }

    #[test]
    fn forward_parallel_to_normal_uses_the_fallback() {
        // Forward (+Z) is exactly the normal.
        let n = Vec3::new(0.0, 0.0, 1.0);
        let f = forward_on_surface(Quat::identity(), n);
        assert!(f.iter().all(|c| c.is_finite()));
        assert!((f.norm() - 1.0).abs() < EPS);
        assert!(f.dot(&n).abs() < EPS);
        // First fallback: n x WORLD_UP.
        assert!(approx(f, n.cross(&WORLD_UP).normalize()));
    }

    #[test]
    fn tangent_fallback_tries_world_right_when_normal_is_vertical() {
        let f = tangent_fallback(WORLD_UP);
        assert!(approx(f, WORLD_UP.cross(&WORLD_RIGHT)));
        assert!(f.dot(&WORLD_UP).abs() < EPS);
    }

    #[test]
    fn smoothing_clamps_to_a_full_step() {
        let target = Quat::from_axis_angle(&Vec3::x_axis(), 1.0);
        let snapped = smooth_rotation(Quat::identity(), target, 100.0, 0.02);
        assert_eq!(snapped, target);

        let frozen = smooth_rotation(Quat::identity(), target, 0.0, 0.02);
        assert_eq!(frozen, Quat::identity());
    }

    #[test]
    fn smoothing_covers_the_requested_fraction() {
        let target = Quat::from_axis_angle(&Vec3::x_axis(), 1.0);
        let half = smooth_rotation(Quat::identity(), target, 25.0, 0.02);
        assert!((half.angle() - 0.5).abs() < EPS);
    }

    #[test]
    fn project_on_plane_removes_the_normal_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let p = project_on_plane(v, Vec3::new(0.0, 2.0, 0.0));
        assert!(approx(p, Vec3::new(1.0, 0.0, 3.0)));
    }
}
