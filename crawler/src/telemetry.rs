//! Read-only snapshots for dashboards and logs.
//!
//! Nothing in here feeds back into the controller. Readouts are deterministic: the motor
//! figures are a pure function of the commanded surface speed.

use crate::{
    config::max_move_speed,
    constants::{
        MOTOR_IDLE_SPEED, MOTOR_MAX_CURRENT_A, MOTOR_MAX_RPM, MOTOR_MAX_TEMP_C,
        MOTOR_NOMINAL_VOLTAGE,
    },
    controller::{LocomotionController, Mode, TickReport},
    orientation::up_misalignment,
    tools::ToolState,
    types::{LOCAL_FORWARD, LOCAL_UP, Quat, Vec3, WORLD_UP},
};

/// Roll, pitch and yaw (degrees, each in `[-180, 180]`) relative to a reference rotation.
///
/// Angles use the robot frame: yaw about +Y, pitch nose-up positive, roll about forward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttitudeReadout {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl AttitudeReadout {
    /// Attitude of `current` as seen from `reference` (usually the spawn orientation).
    pub fn relative(reference: Quat, current: Quat) -> Self {
        let relative = reference.inverse() * current;
        let forward = relative * LOCAL_FORWARD;
        let up = relative * LOCAL_UP;

        let horizontal = (forward.x * forward.x + forward.z * forward.z).sqrt();
        let yaw = forward.x.atan2(forward.z);
        let pitch = forward.y.atan2(horizontal);

        // Roll is measured against the up a wings-level robot would have with this forward.
        let level_up = WORLD_UP - forward * forward.dot(&WORLD_UP);
        let roll = match level_up.try_normalize(1.0e-6) {
            Some(level_up) => level_up.cross(&up).dot(&forward).atan2(level_up.dot(&up)),
            None => 0.0,
        };

        Self {
            roll: roll.to_degrees(),
            pitch: pitch.to_degrees(),
            yaw: yaw.to_degrees(),
        }
    }
}

/// Synthetic drive-motor figures scaled by how hard the robot is being driven.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotorReadout {
    /// Load factor in `[0, 1]`.
    pub load: f32,
    pub rpm: f32,
    pub temperature_c: f32,
    pub voltage_v: f32,
    pub current_a: f32,
}

impl MotorReadout {
    pub fn from_speed(speed: f32) -> Self {
        let speed = if speed.is_finite() { speed.abs() } else { 0.0 };
        if speed < MOTOR_IDLE_SPEED {
            return Self::default();
        }
        let load = (speed / max_move_speed()).clamp(0.0, 1.0);
        Self {
            load,
            rpm: load * MOTOR_MAX_RPM,
            temperature_c: load * MOTOR_MAX_TEMP_C,
            voltage_v: load * MOTOR_NOMINAL_VOLTAGE,
            current_a: load * MOTOR_MAX_CURRENT_A,
        }
    }
}

/// One telemetry frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    pub position: Vec3,
    pub surface_normal: Vec3,
    /// Logical orientation of the controller.
    pub orientation: Quat,
    pub mode: Mode,
    pub in_contact: bool,
    pub tools: ToolState,
    pub attitude: AttitudeReadout,
    pub motors: MotorReadout,
    /// Remaining angle between the body's presented up and the surface normal (degrees).
    pub alignment_error_deg: f32,
}

impl Telemetry {
    /// Snapshot after a tick. `spawn_orientation` is the logical orientation at spawn.
    pub fn capture(
        controller: &LocomotionController,
        tools: ToolState,
        report: &TickReport,
        position: Vec3,
        spawn_orientation: Quat,
    ) -> Self {
        let presented = report.body_rotation * controller.mesh_offset();
        Self {
            position,
            surface_normal: controller.surface_normal(),
            orientation: controller.orientation(),
            mode: controller.mode(),
            in_contact: controller.in_contact(),
            tools,
            attitude: AttitudeReadout::relative(spawn_orientation, presented),
            motors: MotorReadout::from_speed(report.surface_speed()),
            alignment_error_deg: up_misalignment(presented, controller.surface_normal())
                .to_degrees(),
        }
    }
}
