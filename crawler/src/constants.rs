/*!
Locomotion defaults and numeric tolerances.

These constants centralize the parameters used by the surface tracker, the
orientation integrator and the configuration defaults. Keeping them together
makes tuning easier and keeps the tick deterministic across platforms.

Notes
- Distances are in meters, time in seconds, angles in degrees unless the name says
  otherwise.
- Favor practical world-space tolerances over machine epsilon.
*/

/// Default linear speed along the surface (meters per second).
pub const DEFAULT_LINEAR_SPEED: f32 = 5.0;

/// Default yaw rate at full rotate input (degrees per second).
pub const DEFAULT_ANGULAR_SPEED: f32 = 120.0;

/// Default magnet hold-down, applied as an acceleration along `-normal` (m/s^2).
pub const DEFAULT_MAGNET_FORCE: f32 = 30.0;

/// Default slerp rate of the written body rotation toward the target (1/s).
///
/// Per tick the body covers `clamp01(rate * dt)` of the remaining rotation.
pub const DEFAULT_ALIGN_RESPONSIVENESS: f32 = 8.0;

/// Minimum angular deviation before a tracked surface normal may change (degrees).
pub const DEFAULT_HYSTERESIS_DEGREES: f32 = 5.0;

/// Rest-pose correction of the robot asset, Euler XYZ in degrees.
///
/// The shipped robot mesh is authored lying down; without this it would stand up.
pub const DEFAULT_MESH_OFFSET_DEGREES: [f32; 3] = [90.0, 0.0, 0.0];

/// Rotate-axis magnitude below which no yaw is integrated.
pub const INPUT_DEAD_ZONE: f32 = 1.0e-3;

/// Squared length below which a projected tangent is treated as degenerate.
pub const DEGENERATE_TANGENT_SQ: f32 = 1.0e-3;

/// Squared length below which a contact normal cannot be normalized.
pub const MIN_NORMAL_LEN_SQ: f32 = 1.0e-12;

/// Linear speeds selectable through the five speed preset slots (m/s).
///
/// Slot 1 is index 0.
pub const SPEED_PRESETS: [f32; 5] = [1.0, 3.0, 5.0, 6.0, 8.0];

/// Nominal motor figures at full speed, used for telemetry readouts.
pub const MOTOR_MAX_RPM: f32 = 250.0;
pub const MOTOR_MAX_TEMP_C: f32 = 65.0;
pub const MOTOR_NOMINAL_VOLTAGE: f32 = 23.5;
pub const MOTOR_MAX_CURRENT_A: f32 = 30.0;

/// Below this tangent speed (m/s) the motors read as idle.
pub const MOTOR_IDLE_SPEED: f32 = 0.01;
