//! Rapier host for the crawler locomotion core.
//!
//! Builds a static hull out of panels, puts one magnetic robot on it and steps both the
//! controller and the physics world on a fixed timestep.

pub mod body;
pub mod config;
pub mod contacts;
pub mod error;
pub mod hull;
pub mod session;
pub mod transition;
pub mod world;

pub use body::RapierBody;
pub use config::{SimConfig, SimSettings};
pub use contacts::{ContactRouter, RouteOutcome};
pub use error::{Result, SimError};
pub use hull::{HullPanel, PanelShape, collider_from_panel, demo_compartment};
pub use session::{CameraView, RobotSession, StepOutcome};
pub use transition::{DockPose, DockTransition, TransitionState};
pub use world::{HullWorld, RobotHandles, TouchedSurface};
