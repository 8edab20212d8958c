/*!
One robot crawling a hull, stepped on a fixed timestep.

Per tick, in order:
1. Drain one-shot control events (camera, tools, speed presets, exit).
2. Route the contacts of the previous physics step into the surface tracker.
3. Sample input and run the locomotion tick against the robot body.
4. Advance the docking transition, if one is running. It writes the body pose last.
5. Step the physics world.

The controller never sees Rapier types; the session converts on both sides.
*/

use crawler::{
    ControlEvent, InputSource, LocomotionController, Quat, SpeedPreset, Telemetry, TickReport,
    ToolState, Vec3,
};
use rapier3d::prelude::ColliderHandle;

use crate::{
    body::RapierBody,
    config::SimConfig,
    contacts::{ContactRouter, RouteOutcome},
    error::{Result, SimError},
    hull::{HullPanel, demo_compartment},
    transition::{DockPose, DockTransition, TransitionState},
    world::{HullWorld, RobotHandles},
};

/// Which camera the operator is looking through. Only the flag lives here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraView {
    #[default]
    Follow,
    Onboard,
}

impl CameraView {
    fn toggled(self) -> Self {
        match self {
            CameraView::Follow => CameraView::Onboard,
            CameraView::Onboard => CameraView::Follow,
        }
    }
}

/// What one session tick did.
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    /// Index of the tick that just ran (starting at 0).
    pub tick: u64,
    pub report: TickReport,
    pub route: RouteOutcome<ColliderHandle>,
    /// State of the docking transition, if one ran this tick.
    pub docking: Option<TransitionState>,
}

pub struct RobotSession<I> {
    world: HullWorld,
    robot: RobotHandles,
    controller: LocomotionController,
    router: ContactRouter<ColliderHandle>,
    input: I,
    tools: ToolState,
    camera: CameraView,
    transition: Option<DockTransition>,
    spawn_orientation: Quat,
    tick: u64,
    exit_requested: bool,
}

impl<I: InputSource> RobotSession<I> {
    /// Build a session over `panels`, with the robot spawned upright at the origin.
    pub fn new(config: &SimConfig, panels: Vec<HullPanel>, input: I) -> Result<Self> {
        config.validate()?;

        let spawn_orientation = Quat::identity();
        let controller = LocomotionController::new(config.locomotion.clone(), spawn_orientation)?;

        let mut world = HullWorld::build(panels, config.sim.gravity(), config.sim.dt);
        let robot = world.spawn_robot(
            Vec3::new(0.0, config.sim.spawn_height, 0.0),
            controller.target_body_rotation(),
            config.sim.robot_half_extents(),
            controller.mesh_offset(),
        );

        log::info!(
            "Robot spawned at height {:.2} m ({} m/s, {} deg/s)",
            config.sim.spawn_height,
            config.locomotion.linear_speed,
            config.locomotion.angular_speed
        );

        Ok(Self {
            world,
            robot,
            controller,
            router: ContactRouter::new(),
            input,
            tools: ToolState::default(),
            camera: CameraView::default(),
            transition: None,
            spawn_orientation,
            tick: 0,
            exit_requested: false,
        })
    }

    /// A session inside the demo compartment sized by `config`.
    pub fn demo(config: &SimConfig, input: I) -> Result<Self> {
        let panels = demo_compartment(config.sim.compartment_half_extents());
        Self::new(config, panels, input)
    }

    #[inline]
    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    #[inline]
    pub fn world(&self) -> &HullWorld {
        &self.world
    }

    #[inline]
    pub fn robot(&self) -> RobotHandles {
        self.robot
    }

    #[inline]
    pub fn input(&self) -> &I {
        &self.input
    }

    #[inline]
    pub fn tools(&self) -> ToolState {
        self.tools
    }

    #[inline]
    pub fn camera(&self) -> CameraView {
        self.camera
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    #[inline]
    pub fn is_docking(&self) -> bool {
        self.transition.is_some()
    }

    pub fn robot_position(&self) -> Option<Vec3> {
        self.world.body(self.robot.body).map(|b| *b.translation())
    }

    /// Enable or disable player control (input source and controller together).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.input.set_enabled(enabled);
        self.controller.set_enabled(enabled);
    }

    /// Hand the robot to a scripted move toward `dock`, taking `1 / speed` seconds.
    pub fn begin_docking(&mut self, dock: DockPose, speed: f32) -> Result<()> {
        let body = self.world.body_mut(self.robot.body).ok_or(SimError::RobotMissing)?;
        let transition =
            DockTransition::begin(&mut self.controller, &RapierBody(body), dock, speed)?;
        self.transition = Some(transition);
        Ok(())
    }

    /// Run one fixed tick.
    pub fn step(&mut self) -> Result<StepOutcome> {
        while let Some(event) = self.input.next_event() {
            self.handle_event(event);
        }

        let touched = self.world.touched_surfaces(self.robot.collider);
        let route = self.router.route(
            touched.iter().map(|t| (t.collider, t.samples.as_slice())),
            &mut self.controller,
        );
        if let RouteOutcome::Entered(collider, _) | RouteOutcome::Adopted(collider, _) = route {
            log::debug!(
                "Surface is now panel {:?} (tick {})",
                self.world.panel_id(collider),
                self.tick
            );
        }

        let input = self.input.sample();
        let dt = self.world.dt();
        let body = self
            .world
            .body_mut(self.robot.body)
            .ok_or(SimError::RobotMissing)?;
        let mut port = RapierBody(body);
        let report = self.controller.tick(input, &mut port, dt);

        let docking = self
            .transition
            .as_mut()
            .map(|t| t.advance(&mut self.controller, &mut port, dt));
        if docking == Some(TransitionState::Finished) {
            self.transition = None;
        }

        self.world.step();

        let outcome = StepOutcome {
            tick: self.tick,
            report,
            route,
            docking,
        };
        self.tick += 1;
        Ok(outcome)
    }

    /// Telemetry frame for a tick report produced by this session.
    pub fn telemetry(&self, report: &TickReport) -> Telemetry {
        Telemetry::capture(
            &self.controller,
            self.tools,
            report,
            self.robot_position().unwrap_or_else(Vec3::zeros),
            self.spawn_orientation,
        )
    }

    fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::ToggleCamera => {
                self.camera = self.camera.toggled();
                log::info!("Camera view: {:?}", self.camera);
            }
            ControlEvent::ToggleCleaning => {
                self.tools.toggle_cleaning_head();
            }
            ControlEvent::ToggleCutting => {
                self.tools.toggle_plasma_torch();
            }
            ControlEvent::SpeedPreset(slot) => {
                let applied = SpeedPreset::from_slot(slot)
                    .and_then(|preset| self.controller.apply_speed_preset(preset));
                if let Err(err) = applied {
                    log::warn!("Ignoring speed preset: {err}");
                }
            }
            ControlEvent::Exit => {
                log::info!("Exit requested at tick {}", self.tick);
                self.exit_requested = true;
            }
        }
    }
}
