use crawler::{Quat, RigidBodyPort, Vec3};
use rapier3d::prelude::RigidBody;

/// Exposes a Rapier rigid body to the locomotion controller.
///
/// Moves teleport the body for the coming step (the body keeps its velocity). The magnet
/// acceleration is converted to a force with the body's current mass and replaces any
/// force left over from the previous tick.
pub struct RapierBody<'a>(pub &'a mut RigidBody);

impl RigidBodyPort for RapierBody<'_> {
    #[inline]
    fn position(&self) -> Vec3 {
        *self.0.translation()
    }

    #[inline]
    fn rotation(&self) -> Quat {
        *self.0.rotation()
    }

    #[inline]
    fn move_position(&mut self, position: Vec3) {
        self.0.set_translation(position, true);
    }

    #[inline]
    fn move_rotation(&mut self, rotation: Quat) {
        self.0.set_rotation(rotation, true);
    }

    fn apply_acceleration(&mut self, acceleration: Vec3) {
        let mass = self.0.mass();
        self.0.reset_forces(true);
        self.0.add_force(acceleration * mass, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier3d::prelude::*;

    #[test]
    fn port_writes_reach_the_rapier_body() {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let handle = bodies.insert(RigidBodyBuilder::dynamic().build());
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(0.5, 0.5, 0.5).density(2.0).build(),
            handle,
            &mut bodies,
        );
        let body = bodies.get_mut(handle).unwrap();
        let mass = body.mass();

        let mut port = RapierBody(body);
        port.move_position(Vec3::new(1.0, 2.0, 3.0));
        let turned = Quat::from_axis_angle(&Vec3::y_axis(), 0.5);
        port.move_rotation(turned);
        port.apply_acceleration(Vec3::new(0.0, -30.0, 0.0));
        port.apply_acceleration(Vec3::new(0.0, -10.0, 0.0));

        assert_eq!(port.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(port.rotation().angle_to(&turned) < 1.0e-3);
        // The second write replaced the first.
        assert!((port.0.user_force() - Vec3::new(0.0, -10.0 * mass, 0.0)).norm() < 1.0e-3);
    }
}
