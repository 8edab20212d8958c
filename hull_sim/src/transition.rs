//! Scripted docking move.
//!
//! While a transition runs it owns the robot: the controller is disabled (magnet and
//! alignment still run) and the body pose is driven from the start pose to the dock pose.
//! On completion the body is snapped to the dock, the controller adopts the docked
//! rotation and input is re-enabled.

use crawler::{ConfigError, LocomotionController, Quat, RigidBodyPort, Vec3};

/// Where the robot should end up, in logical orientation (not body rotation).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockPose {
    pub position: Vec3,
    pub orientation: Quat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionState {
    Running,
    Finished,
}

#[derive(Clone, Debug)]
pub struct DockTransition {
    start_position: Vec3,
    start_rotation: Quat,
    dock_position: Vec3,
    dock_rotation: Quat,
    duration: f32,
    elapsed: f32,
}

impl DockTransition {
    /// Start moving toward `dock`, taking `1 / speed` seconds.
    pub fn begin<B: RigidBodyPort>(
        controller: &mut LocomotionController,
        body: &B,
        dock: DockPose,
        speed: f32,
    ) -> Result<Self, ConfigError> {
        if !speed.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "dock_speed",
                value: speed,
            });
        }
        if speed <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "dock_speed",
                value: speed,
            });
        }

        controller.set_enabled(false);
        log::info!(
            "Docking toward [{:.2}, {:.2}, {:.2}] over {:.2} s",
            dock.position.x,
            dock.position.y,
            dock.position.z,
            1.0 / speed
        );
        Ok(Self {
            start_position: body.position(),
            start_rotation: body.rotation(),
            dock_position: dock.position,
            dock_rotation: controller.body_rotation_for(dock.orientation),
            duration: 1.0 / speed,
            elapsed: 0.0,
        })
    }

    /// Fraction of the move completed, in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Advance by `dt` and write the interpolated pose.
    pub fn advance<B: RigidBodyPort>(
        &mut self,
        controller: &mut LocomotionController,
        body: &mut B,
        dt: f32,
    ) -> TransitionState {
        self.elapsed += dt.max(0.0);
        let t = self.progress();

        if t >= 1.0 {
            body.move_position(self.dock_position);
            body.move_rotation(self.dock_rotation);
            controller.resync_to_body(self.dock_rotation);
            controller.set_enabled(true);
            log::info!("Docked");
            return TransitionState::Finished;
        }

        body.move_position(self.start_position.lerp(&self.dock_position, t));
        let rotation = self
            .start_rotation
            .try_slerp(&self.dock_rotation, t, f32::EPSILON)
            .unwrap_or(self.dock_rotation);
        body.move_rotation(rotation);
        TransitionState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler::{LocomotionConfig, LOCAL_FORWARD, Mode, PoseBody};

    fn setup() -> (LocomotionController, PoseBody) {
        let controller =
            LocomotionController::new(LocomotionConfig::default(), Quat::identity()).unwrap();
        let body = PoseBody::new(Vec3::zeros(), controller.target_body_rotation());
        (controller, body)
    }

    fn dock() -> DockPose {
        DockPose {
            position: Vec3::new(2.0, 0.0, 0.0),
            orientation: Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2),
        }
    }

    #[test]
    fn rejects_unusable_speeds() {
        let (mut controller, body) = setup();
        assert!(DockTransition::begin(&mut controller, &body, dock(), 0.0).is_err());
        assert!(DockTransition::begin(&mut controller, &body, dock(), f32::NAN).is_err());
        assert!(controller.is_enabled());
    }

    #[test]
    fn moves_then_snaps_and_hands_back_control() {
        let (mut controller, mut body) = setup();
        // 2 units of speed: half a second, 25 ticks of 0.02 s.
        let mut transition = DockTransition::begin(&mut controller, &body, dock(), 2.0).unwrap();
        assert_eq!(controller.mode(), Mode::Disabled);

        for _ in 0..12 {
            assert_eq!(
                transition.advance(&mut controller, &mut body, 0.02),
                TransitionState::Running
            );
        }
        assert!((transition.progress() - 0.48).abs() < 1.0e-4);
        assert!((body.position - Vec3::new(0.96, 0.0, 0.0)).norm() < 1.0e-4);
        assert!(!controller.is_enabled());

        let mut state = TransitionState::Running;
        for _ in 0..20 {
            state = transition.advance(&mut controller, &mut body, 0.02);
            if state == TransitionState::Finished {
                break;
            }
        }
        assert_eq!(state, TransitionState::Finished);
        assert_eq!(body.position, Vec3::new(2.0, 0.0, 0.0));
        assert!(controller.is_enabled());

        // The controller now heads the way the dock faces.
        let heading = controller.orientation() * LOCAL_FORWARD;
        assert!((heading - Vec3::new(1.0, 0.0, 0.0)).norm() < 1.0e-4);
    }
}
