//! Routes per-collider contact reports into the locomotion controller.
//!
//! The controller only knows about contact samples. Collider identity is tracked here:
//! - A collider that was not touched last step is *entered*: its best normal commits
//!   without the hysteresis gate. When several are entered in the same step, the one
//!   most compatible with the current normal wins, first one on ties.
//! - The current surface collider, while still touched, feeds the hysteresis update.
//! - If the surface collider is gone but others remain, the one most compatible with the
//!   current normal becomes the surface.
//! - If nothing is touched, contact loss is reported once.

use crawler::{ContactSample, LocomotionController, SurfaceUpdate, Vec3, best_contact_normal};

/// What the router did with one step's contacts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RouteOutcome<K> {
    /// Nothing touched, and nothing was touched before either.
    Idle,
    /// A new collider was entered and became the surface.
    Entered(K, SurfaceUpdate),
    /// The surface collider is still touched.
    Stayed(K, SurfaceUpdate),
    /// The surface collider was left; another touched collider took over.
    Adopted(K, SurfaceUpdate),
    /// All contact was lost this step.
    Lost(SurfaceUpdate),
}

impl<K> RouteOutcome<K> {
    /// The surface update the controller reported, if any.
    pub fn update(&self) -> SurfaceUpdate {
        match self {
            RouteOutcome::Idle => SurfaceUpdate::Unchanged,
            RouteOutcome::Entered(_, u)
            | RouteOutcome::Stayed(_, u)
            | RouteOutcome::Adopted(_, u)
            | RouteOutcome::Lost(u) => *u,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContactRouter<K> {
    touched: Vec<K>,
    surface: Option<K>,
}

impl<K> Default for ContactRouter<K> {
    fn default() -> Self {
        Self {
            touched: Vec::new(),
            surface: None,
        }
    }
}

impl<K: Copy + PartialEq> ContactRouter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collider currently treated as the surface.
    #[inline]
    pub fn surface(&self) -> Option<K> {
        self.surface
    }

    /// Feed one step's contacts, grouped by collider in a deterministic order.
    pub fn route<'a, I>(
        &mut self,
        contacts: I,
        controller: &mut LocomotionController,
    ) -> RouteOutcome<K>
    where
        I: IntoIterator<Item = (K, &'a [ContactSample])>,
    {
        let contacts: Vec<(K, &[ContactSample])> = contacts
            .into_iter()
            .filter(|(_, samples)| !samples.is_empty())
            .collect();

        if contacts.is_empty() {
            let had_contact = !self.touched.is_empty() || self.surface.is_some();
            self.touched.clear();
            self.surface = None;
            return if had_contact {
                RouteOutcome::Lost(controller.contact_lost())
            } else {
                RouteOutcome::Idle
            };
        }

        let entered = contacts
            .iter()
            .filter(|(key, _)| !self.touched.contains(key));
        let outcome = match most_compatible(entered, controller.surface_normal()) {
            Some((key, samples)) => {
                self.surface = Some(key);
                RouteOutcome::Entered(key, controller.enter_surface(samples))
            }
            None => self.continue_surface(&contacts, controller),
        };

        self.touched = contacts.iter().map(|(key, _)| *key).collect();
        outcome
    }

    fn continue_surface(
        &mut self,
        contacts: &[(K, &[ContactSample])],
        controller: &mut LocomotionController,
    ) -> RouteOutcome<K> {
        if let Some(surface) = self.surface {
            if let Some((_, samples)) = contacts.iter().find(|(key, _)| *key == surface) {
                return RouteOutcome::Stayed(surface, controller.ingest_contacts(samples));
            }
        }

        match most_compatible(contacts.iter(), controller.surface_normal()) {
            Some((key, samples)) => {
                self.surface = Some(key);
                RouteOutcome::Adopted(key, controller.ingest_contacts(samples))
            }
            None => RouteOutcome::Idle,
        }
    }
}

/// The collider whose best normal has the largest dot with `reference`. Strict `>`, so
/// the first one wins ties. Colliders with only degenerate normals are skipped.
fn most_compatible<'c, 's: 'c, K: Copy + 'c>(
    contacts: impl Iterator<Item = &'c (K, &'s [ContactSample])>,
    reference: Vec3,
) -> Option<(K, &'s [ContactSample])> {
    let mut best: Option<(K, &'s [ContactSample], f32)> = None;
    for &(key, samples) in contacts {
        let Some(normal) = best_contact_normal(samples, reference) else {
            continue;
        };
        let dot = normal.dot(&reference);
        if best.is_none_or(|(_, _, best_dot)| dot > best_dot) {
            best = Some((key, samples, dot));
        }
    }
    best.map(|(key, samples, _)| (key, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler::{LocomotionConfig, Quat, Vec3, WORLD_UP};

    fn controller() -> LocomotionController {
        LocomotionController::new(LocomotionConfig::default(), Quat::identity()).unwrap()
    }

    fn samples(normal: Vec3) -> Vec<ContactSample> {
        vec![ContactSample::new(Vec3::zeros(), normal)]
    }

    /// Unit vector tilted `degrees` from +Y toward +X.
    fn tilted(degrees: f32) -> Vec3 {
        let r = degrees.to_radians();
        Vec3::new(r.sin(), r.cos(), 0.0)
    }

    #[test]
    fn no_contacts_ever_is_idle() {
        let mut router = ContactRouter::<u32>::new();
        let mut controller = controller();
        assert_eq!(router.route([], &mut controller), RouteOutcome::Idle);
        assert!(!controller.in_contact());
    }

    #[test]
    fn entering_bypasses_hysteresis_and_staying_applies_it() {
        let mut router = ContactRouter::new();
        let mut controller = controller();

        // A 2 degree ramp is entered: committed despite being under the gate.
        let ramp = samples(tilted(2.0));
        let outcome = router.route([(7u32, ramp.as_slice())], &mut controller);
        assert!(matches!(outcome, RouteOutcome::Entered(7, _)));
        assert!(outcome.update().is_changed());
        assert_eq!(router.surface(), Some(7));

        // Jitter on the same collider stays within the gate.
        let jitter = samples(tilted(4.0));
        let outcome = router.route([(7u32, jitter.as_slice())], &mut controller);
        assert_eq!(outcome, RouteOutcome::Stayed(7, SurfaceUpdate::Unchanged));
        assert!((controller.surface_normal() - tilted(2.0)).norm() < 1.0e-5);
    }

    #[test]
    fn climbing_onto_a_wall_switches_the_surface() {
        let mut router = ContactRouter::new();
        let mut controller = controller();
        let floor = samples(WORLD_UP);
        let wall = samples(Vec3::new(0.0, 0.0, -1.0));

        router.route([(1u32, floor.as_slice())], &mut controller);
        let outcome = router.route([(1, floor.as_slice()), (3, wall.as_slice())], &mut controller);
        assert!(matches!(outcome, RouteOutcome::Entered(3, _)));
        assert_eq!(controller.surface_normal(), Vec3::new(0.0, 0.0, -1.0));

        // Still touching both: the wall stays the surface, the floor is ignored.
        let outcome = router.route([(1, floor.as_slice()), (3, wall.as_slice())], &mut controller);
        assert_eq!(outcome, RouteOutcome::Stayed(3, SurfaceUpdate::Unchanged));
    }

    #[test]
    fn leaving_the_surface_adopts_the_most_compatible_collider() {
        let mut router = ContactRouter::new();
        let mut controller = controller();
        let floor = samples(WORLD_UP);
        let left = samples(Vec3::new(1.0, 0.0, 0.0));
        let slope = samples(tilted(-30.0));

        router.route([(1u32, floor.as_slice())], &mut controller);
        // Wall (90 deg) and slope (30 deg) are entered together; the slope is closer.
        let outcome = router.route(
            [(1, floor.as_slice()), (2, left.as_slice()), (4, slope.as_slice())],
            &mut controller,
        );
        assert!(matches!(outcome, RouteOutcome::Entered(4, _)));
        assert_eq!(router.surface(), Some(4));

        // Slope is left. Against the slope's normal the floor (30 deg) beats the wall (120 deg).
        let outcome = router.route([(1, floor.as_slice()), (2, left.as_slice())], &mut controller);
        assert!(matches!(outcome, RouteOutcome::Adopted(1, _)));
        assert_eq!(controller.surface_normal(), WORLD_UP);
    }

    #[test]
    fn simultaneous_entries_pick_the_closest_normal_regardless_of_order() {
        let floor = samples(WORLD_UP);
        let wall = samples(Vec3::new(0.0, 0.0, -1.0));

        for (first, second) in [(&floor, &wall), (&wall, &floor)] {
            let mut router = ContactRouter::new();
            let mut controller = controller();
            let outcome = router.route(
                [(1u32, first.as_slice()), (2, second.as_slice())],
                &mut controller,
            );
            let floor_key = if first == &floor { 1 } else { 2 };
            assert!(matches!(outcome, RouteOutcome::Entered(k, _) if k == floor_key));
            assert_eq!(router.surface(), Some(floor_key));
            assert_eq!(controller.surface_normal(), WORLD_UP);
        }
    }

    #[test]
    fn equally_compatible_entries_keep_the_first() {
        let mut router = ContactRouter::new();
        let mut controller = controller();
        let left = samples(tilted(-20.0));
        let right = samples(tilted(20.0));

        let outcome =
            router.route([(3u32, left.as_slice()), (8, right.as_slice())], &mut controller);
        assert!(matches!(outcome, RouteOutcome::Entered(3, _)));
        assert!((controller.surface_normal() - tilted(-20.0)).norm() < 1.0e-6);
    }

    #[test]
    fn losing_everything_reports_once() {
        let mut router = ContactRouter::new();
        let mut controller = controller();
        let wall = samples(Vec3::new(1.0, 0.0, 0.0));
        router.route([(5u32, wall.as_slice())], &mut controller);

        let outcome = router.route([], &mut controller);
        assert_eq!(outcome, RouteOutcome::Lost(SurfaceUpdate::Unchanged));
        assert!(!controller.in_contact());
        assert_eq!(router.surface(), None);
        // Default policy keeps the wall normal.
        assert_eq!(controller.surface_normal(), Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(router.route([], &mut controller), RouteOutcome::Idle);
    }

    #[test]
    fn colliders_with_empty_sample_lists_are_ignored() {
        let mut router = ContactRouter::new();
        let mut controller = controller();
        let none: Vec<ContactSample> = Vec::new();
        let outcome = router.route([(9u32, none.as_slice())], &mut controller);
        assert_eq!(outcome, RouteOutcome::Idle);
        assert_eq!(router.surface(), None);
    }
}
