//! Surface normal estimation from contact samples.
//!
//! The tracker turns the (possibly many, possibly noisy) contacts reported for one
//! collider into a single debounced surface normal.
//!
//! # Rules
//! - Among all samples, the candidate is the normal with the largest dot product against
//!   the current normal. Ties keep the earliest sample (strict `>` comparison).
//! - The candidate replaces the current normal only when it deviates by more than the
//!   hysteresis threshold. Smaller deviations are treated as edge/corner jitter.
//! - No samples means no change. Loss of contact is a controller-level policy.
//! - The tracked normal is always unit length. Samples whose normal cannot be normalized
//!   (zero length, NaN) are skipped.

use crate::{
    constants::MIN_NORMAL_LEN_SQ,
    types::{ContactSample, Vec3, WORLD_UP},
};

/// Outcome of feeding one batch of contacts into the tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceUpdate {
    /// The tracked normal did not move.
    Unchanged,
    /// A new normal was committed.
    Changed {
        previous: Vec3,
        current: Vec3,
        /// Angle between `previous` and `current` (radians).
        angle: f32,
    },
}

impl SurfaceUpdate {
    #[inline]
    pub fn is_changed(&self) -> bool {
        matches!(self, SurfaceUpdate::Changed { .. })
    }
}

/// Debounced estimate of the surface normal the robot is standing on.
#[derive(Clone, Debug)]
pub struct SurfaceTracker {
    normal: Vec3,
    hysteresis_radians: f32,
}

impl SurfaceTracker {
    /// A tracker starting at world-up.
    pub fn new(hysteresis_radians: f32) -> Self {
        Self {
            normal: WORLD_UP,
            hysteresis_radians: hysteresis_radians.max(0.0),
        }
    }

    /// A tracker starting at `initial`, or world-up if `initial` is degenerate.
    pub fn with_normal(initial: Vec3, hysteresis_radians: f32) -> Self {
        Self {
            normal: unit_normal(initial).unwrap_or(WORLD_UP),
            ..Self::new(hysteresis_radians)
        }
    }

    /// The current unit surface normal.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn hysteresis_radians(&self) -> f32 {
        self.hysteresis_radians
    }

    /// Feed this tick's contacts for the current surface, applying the hysteresis gate.
    pub fn update_from_contacts(&mut self, samples: &[ContactSample]) -> SurfaceUpdate {
        let next = select_surface_normal(samples, self.normal, self.hysteresis_radians);
        self.commit(next)
    }

    /// Commit the best-matching normal of a newly touched collider, bypassing the gate.
    ///
    /// Used by hosts that track collider identity: entering a different surface is a
    /// deliberate transition, not jitter.
    pub fn commit_entered(&mut self, samples: &[ContactSample]) -> SurfaceUpdate {
        match best_contact_normal(samples, self.normal) {
            Some(best) => self.commit(best),
            None => SurfaceUpdate::Unchanged,
        }
    }

    /// Replace the tracked normal outright. Degenerate vectors are ignored.
    pub fn commit(&mut self, normal: Vec3) -> SurfaceUpdate {
        let Some(normal) = unit_normal(normal) else {
            return SurfaceUpdate::Unchanged;
        };
        if normal == self.normal {
            return SurfaceUpdate::Unchanged;
        }

        let previous = self.normal;
        self.normal = normal;
        SurfaceUpdate::Changed {
            previous,
            current: normal,
            angle: previous.angle(&normal),
        }
    }
}

/// Pick the contact normal most compatible with `reference`.
///
/// Returns `None` when no sample carries a usable normal. The first sample wins ties.
pub fn best_contact_normal(samples: &[ContactSample], reference: Vec3) -> Option<Vec3> {
    let mut best: Option<(Vec3, f32)> = None;
    for normal in samples.iter().filter_map(|s| unit_normal(s.normal)) {
        let dot = reference.dot(&normal);
        if best.map_or(true, |(_, best_dot)| dot > best_dot) {
            best = Some((normal, dot));
        }
    }
    best.map(|(normal, _)| normal)
}

/// The debouncing rule: returns `current` unless the best candidate deviates from it by
/// more than `hysteresis_radians`, in which case the candidate is returned.
pub fn select_surface_normal(
    samples: &[ContactSample],
    current: Vec3,
    hysteresis_radians: f32,
) -> Vec3 {
    match best_contact_normal(samples, current) {
        Some(best) if current.angle(&best) > hysteresis_radians => best,
        _ => current,
    }
}

#[inline]
fn unit_normal(v: Vec3) -> Option<Vec3> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    v.try_normalize(MIN_NORMAL_LEN_SQ.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_DEG: f32 = 5.0 * std::f32::consts::PI / 180.0;

    fn sample(normal: Vec3) -> ContactSample {
        ContactSample::new(Vec3::zeros(), normal)
    }

    /// A unit vector tilted `degrees` away from +Y toward +X.
    fn tilted(degrees: f32) -> Vec3 {
        let r = degrees.to_radians();
        Vec3::new(r.sin(), r.cos(), 0.0)
    }

    #[test]
    fn empty_contacts_leave_the_normal_alone() {
        let mut tracker = SurfaceTracker::new(FIVE_DEG);
        assert_eq!(tracker.update_from_contacts(&[]), SurfaceUpdate::Unchanged);
        assert_eq!(tracker.normal(), WORLD_UP);
    }

    #[test]
    fn sub_threshold_jitter_never_moves_the_normal() {
        let mut tracker = SurfaceTracker::new(FIVE_DEG);
        for deg in [0.5, -3.0, 4.9, 2.0, -4.99, 1.0] {
            let update = tracker.update_from_contacts(&[sample(tilted(deg))]);
            assert_eq!(update, SurfaceUpdate::Unchanged);
        }
        assert_eq!(tracker.normal(), WORLD_UP);
    }

    #[test]
    fn a_deviating_sample_triggers_exactly_one_update() {
        let mut tracker = SurfaceTracker::new(FIVE_DEG);
        let wall = Vec3::new(0.0, 0.0, -1.0);

        let update = tracker.update_from_contacts(&[sample(wall)]);
        assert!(update.is_changed());
        assert_eq!(tracker.normal(), wall);

        // Feeding the same contact again is a no-op.
        assert_eq!(
            tracker.update_from_contacts(&[sample(wall)]),
            SurfaceUpdate::Unchanged
        );
    }

    #[test]
    fn change_reports_previous_and_angle() {
        let mut tracker = SurfaceTracker::new(FIVE_DEG);
        let update = tracker.update_from_contacts(&[sample(tilted(30.0))]);
        match update {
            SurfaceUpdate::Changed {
                previous,
                current,
                angle,
            } => {
                assert_eq!(previous, WORLD_UP);
                assert!((current - tilted(30.0)).norm() < 1.0e-6);
                assert!((angle - 30.0_f32.to_radians()).abs() < 1.0e-4);
            }
            SurfaceUpdate::Unchanged => panic!("expected a committed normal"),
        }
    }

    #[test]
    fn best_dot_prefers_the_most_compatible_contact() {
        // Corner: floor tilted 20 degrees and a wall at 90 degrees. The floor wins.
        let samples = [sample(tilted(90.0)), sample(tilted(20.0))];
        let best = best_contact_normal(&samples, WORLD_UP).unwrap();
        assert!((best - tilted(20.0)).norm() < 1.0e-6);
    }

    #[test]
    fn ties_keep_the_first_sample() {
        // Same deviation on either side of +Y.
        let first = tilted(30.0);
        let second = tilted(-30.0);
        let picked = select_surface_normal(&[sample(first), sample(second)], WORLD_UP, FIVE_DEG);
        assert!((picked - first).norm() < 1.0e-6);

        let picked = select_surface_normal(&[sample(second), sample(first)], WORLD_UP, FIVE_DEG);
        assert!((picked - second).norm() < 1.0e-6);
    }

    #[test]
    fn sandwiched_contacts_still_pick_deterministically() {
        // Everything is anti-parallel to the current normal.
        let down = Vec3::new(0.0, -1.0, 0.0);
        let samples = [sample(down), sample(down)];
        let picked = select_surface_normal(&samples, WORLD_UP, FIVE_DEG);
        assert_eq!(picked, down);
    }

    #[test]
    fn unnormalized_samples_are_normalized_and_degenerate_ones_skipped() {
        let mut tracker = SurfaceTracker::new(FIVE_DEG);
        let samples = [
            sample(Vec3::zeros()),
            sample(Vec3::new(f32::NAN, 1.0, 0.0)),
            sample(Vec3::new(3.0, 0.0, 0.0)),
        ];
        tracker.update_from_contacts(&samples);
        assert!((tracker.normal() - Vec3::new(1.0, 0.0, 0.0)).norm() < 1.0e-6);

        // A batch of nothing but degenerate normals is the same as no contacts.
        let update = tracker.update_from_contacts(&[sample(Vec3::zeros())]);
        assert_eq!(update, SurfaceUpdate::Unchanged);
    }

    #[test]
    fn entered_surfaces_bypass_the_gate() {
        let mut tracker = SurfaceTracker::new(FIVE_DEG);
        let update = tracker.commit_entered(&[sample(tilted(2.0))]);
        assert!(update.is_changed());
        assert!((tracker.normal() - tilted(2.0)).norm() < 1.0e-6);
    }

    #[test]
    fn with_normal_falls_back_to_world_up() {
        let tracker = SurfaceTracker::with_normal(Vec3::zeros(), FIVE_DEG);
        assert_eq!(tracker.normal(), WORLD_UP);

        let tracker = SurfaceTracker::with_normal(Vec3::new(0.0, 0.0, 2.0), FIVE_DEG);
        assert_eq!(tracker.normal(), Vec3::new(0.0, 0.0, 1.0));
    }
}
