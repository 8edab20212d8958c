/*!
Surface locomotion controller.

Owns the robot's logical orientation and the surface tracker, and turns one
[`MotionInput`] per physics tick into writes on a [`RigidBodyPort`].

Tick order (fixed; later steps read what earlier steps wrote):
1. Magnet: acceleration `-normal * magnet_force`.
2. Yaw: `rotate.x * angular_speed * dt` degrees about the normal, pre-multiplied.
   Skipped inside the input dead zone.
3. Align: local up onto the normal, pre-multiplied.
4. Forward: local forward projected on the tangent plane, with fallbacks.
5. Translate: `forward * translate.y * linear_speed * dt`.
6. Smooth: body rotation slerps toward `orientation * inverse(mesh_offset)` by
   `clamp01(align_responsiveness * dt)`.

Design notes
- The orientation is never rebuilt from absolute angles. It is composed incrementally,
  so heading survives every surface transition.
- `Disabled` zeroes the input. Magnet and alignment keep running so a disabled robot
  stays attached and upright.
- Logging observes transitions after the math has run. It never feeds back.
*/

use crate::{
    body::RigidBodyPort,
    config::{ContactLossPolicy, LocomotionConfig, SpeedPreset},
    constants::INPUT_DEAD_ZONE,
    error::Result,
    orientation::{align_up_to_normal, forward_on_surface, smooth_rotation, yaw_about_normal},
    surface::{SurfaceTracker, SurfaceUpdate},
    types::{ContactSample, MotionInput, Quat, Vec3, WORLD_UP},
};

/// Whether player input is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Active,
    /// Input is treated as zero. Magnet and alignment continue.
    Disabled,
}

/// Everything one tick computed and wrote.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// The (unit) surface normal the tick ran against.
    pub normal: Vec3,
    /// Unit forward direction on the tangent plane.
    pub forward: Vec3,
    /// Yaw applied this tick (degrees). Zero inside the dead zone.
    pub yaw_degrees: f32,
    /// Position change written to the body.
    pub displacement: Vec3,
    /// Acceleration written to the body.
    pub magnet_acceleration: Vec3,
    /// Rotation the body is converging to.
    pub target_rotation: Quat,
    /// Rotation written to the body.
    pub body_rotation: Quat,
    /// Clamped tick duration.
    pub dt: f32,
}

impl TickReport {
    /// Commanded speed along the surface (m/s).
    #[inline]
    pub fn surface_speed(&self) -> f32 {
        if self.dt > 0.0 {
            self.displacement.norm() / self.dt
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug)]
pub struct LocomotionController {
    config: LocomotionConfig,
    mesh_offset: Quat,
    orientation: Quat,
    tracker: SurfaceTracker,
    mode: Mode,
    in_contact: bool,
}

impl LocomotionController {
    /// Build a controller whose logical orientation starts at `spawn_orientation`.
    ///
    /// The surface normal starts at world-up. Fails on any invalid tunable.
    pub fn new(config: LocomotionConfig, spawn_orientation: Quat) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mesh_offset: config.mesh_offset(),
            tracker: SurfaceTracker::new(config.hysteresis_radians()),
            orientation: spawn_orientation,
            mode: Mode::Active,
            in_contact: false,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Logical orientation (local up = surface normal, local forward = heading).
    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    #[inline]
    pub fn surface_normal(&self) -> Vec3 {
        self.tracker.normal()
    }

    #[inline]
    pub fn mesh_offset(&self) -> Quat {
        self.mesh_offset
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.mode == Mode::Active
    }

    /// True once contacts arrived and until they were reported lost.
    #[inline]
    pub fn in_contact(&self) -> bool {
        self.in_contact
    }

    /// Body rotation that presents `orientation` with the asset's rest pose corrected.
    #[inline]
    pub fn body_rotation_for(&self, orientation: Quat) -> Quat {
        orientation * self.mesh_offset.inverse()
    }

    /// Body rotation for the current logical orientation.
    #[inline]
    pub fn target_body_rotation(&self) -> Quat {
        self.body_rotation_for(self.orientation)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let mode = if enabled { Mode::Active } else { Mode::Disabled };
        if mode != self.mode {
            self.mode = mode;
            log::info!("Locomotion {:?}", mode);
        }
    }

    /// Contacts for the surface the robot is already on. Hysteresis applies.
    pub fn ingest_contacts(&mut self, samples: &[ContactSample]) -> SurfaceUpdate {
        if samples.is_empty() {
            return SurfaceUpdate::Unchanged;
        }
        self.in_contact = true;
        let update = self.tracker.update_from_contacts(samples);
        log_surface_update("contact", &update);
        update
    }

    /// Contacts of a newly entered collider. Committed without the hysteresis gate.
    pub fn enter_surface(&mut self, samples: &[ContactSample]) -> SurfaceUpdate {
        if samples.is_empty() {
            return SurfaceUpdate::Unchanged;
        }
        self.in_contact = true;
        let update = self.tracker.commit_entered(samples);
        log_surface_update("entered", &update);
        update
    }

    /// The robot touches nothing any more. Applies the configured loss policy.
    pub fn contact_lost(&mut self) -> SurfaceUpdate {
        if self.in_contact {
            log::debug!("Surface contact lost (policy {:?})", self.config.contact_loss);
        }
        self.in_contact = false;
        let update = match self.config.contact_loss {
            ContactLossPolicy::Retain => SurfaceUpdate::Unchanged,
            ContactLossPolicy::RevertToWorldUp => self.tracker.commit(WORLD_UP),
        };
        log_surface_update("lost", &update);
        update
    }

    /// Replace the configuration. The tracked normal and orientation are kept.
    pub fn update_config(&mut self, config: LocomotionConfig) -> Result<()> {
        config.validate()?;
        self.tracker =
            SurfaceTracker::with_normal(self.tracker.normal(), config.hysteresis_radians());
        self.mesh_offset = config.mesh_offset();
        self.config = config;
        Ok(())
    }

    pub fn apply_speed_preset(&mut self, preset: SpeedPreset) -> Result<()> {
        self.update_config(self.config.with_speed_preset(preset))?;
        log::info!(
            "Speed preset {} selected ({} m/s)",
            preset.slot(),
            self.config.linear_speed
        );
        Ok(())
    }

    /// Re-seed the logical orientation from a body rotation written by someone else.
    ///
    /// Used after scripted moves (docking) that drive the body directly.
    pub fn resync_to_body(&mut self, body_rotation: Quat) {
        self.orientation = body_rotation * self.mesh_offset;
    }

    /// Run one physics tick.
    ///
    /// A negative `dt` is treated as zero: nothing moves, the magnet still applies.
    pub fn tick<B: RigidBodyPort>(
        &mut self,
        input: MotionInput,
        body: &mut B,
        dt: f32,
    ) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let input = match self.mode {
            Mode::Active => input,
            Mode::Disabled => MotionInput::ZERO,
        };
        let normal = self.tracker.normal();

        // 1. Magnet.
        let magnet_acceleration = -normal * self.config.magnet_force;
        body.apply_acceleration(magnet_acceleration);

        // 2. Yaw about the current normal.
        let mut yaw_degrees = 0.0;
        if input.rotate.x.abs() > INPUT_DEAD_ZONE {
            yaw_degrees = input.rotate.x * self.config.angular_speed * dt;
            self.orientation = yaw_about_normal(self.orientation, normal, yaw_degrees);
        }

        // 3. Align up to the normal.
        self.orientation = align_up_to_normal(self.orientation, normal);

        // 4. Forward on the tangent plane.
        let forward = forward_on_surface(self.orientation, normal);

        // 5. Translate.
        let displacement = forward * (input.translate.y * self.config.linear_speed * dt);
        if displacement != Vec3::zeros() {
            body.move_position(body.position() + displacement);
        }

        // 6. Smooth the body rotation toward the target.
        let target_rotation = self.target_body_rotation();
        let body_rotation = smooth_rotation(
            body.rotation(),
            target_rotation,
            self.config.align_responsiveness,
            dt,
        );
        body.move_rotation(body_rotation);

        TickReport {
            normal,
            forward,
            yaw_degrees,
            displacement,
            magnet_acceleration,
            target_rotation,
            body_rotation,
            dt,
        }
    }
}

fn log_surface_update(source: &str, update: &SurfaceUpdate) {
    if let SurfaceUpdate::Changed { current, angle, .. } = update {
        log::debug!(
            "Surface normal ({source}) -> [{:.3}, {:.3}, {:.3}], turned {:.1} deg",
            current.x,
            current.y,
            current.z,
            angle.to_degrees()
        );
    }
}
