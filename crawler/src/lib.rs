pub mod body;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod orientation;
pub mod surface;
pub mod telemetry;
pub mod tools;
pub mod types;

pub use body::{PoseBody, RigidBodyPort};
pub use config::{ContactLossPolicy, LocomotionConfig, SpeedPreset, max_move_speed};
pub use controller::{LocomotionController, Mode, TickReport};
pub use error::ConfigError;
pub use input::{ControlEvent, InputSource, ScriptedInput};
pub use surface::{SurfaceTracker, SurfaceUpdate, best_contact_normal, select_surface_normal};
pub use telemetry::{AttitudeReadout, MotorReadout, Telemetry};
pub use tools::ToolState;
pub use types::{
    ContactSample, LOCAL_FORWARD, LOCAL_UP, MotionInput, Quat, Vec2, Vec3, WORLD_RIGHT, WORLD_UP,
};
