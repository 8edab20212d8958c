//! hull-sim: drives the crawler around a demo compartment and logs telemetry.
//!
//! # Usage
//!
//! ```bash
//! # With default config (hull-sim.toml if present)
//! cargo run --release --bin hull-sim
//!
//! # With a custom config file
//! cargo run --release --bin hull-sim -- --config my-hull.toml
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crawler::{ControlEvent, MotionInput, ScriptedInput};
use hull_sim::{Result, RobotSession, SimConfig};

const DEFAULT_CONFIG_PATH: &str = "hull-sim.toml";

struct Args {
    config_path: PathBuf,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: hull-sim [--config <path>]");
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: hull-sim [--config <path>]");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

/// Drive across the floor into the +Z bulkhead and up it, turn on the wall and arc
/// away, with a few tool and speed changes along the way. Exits when the script ends.
fn demo_script(ticks_per_second: u64) -> ScriptedInput {
    let s = ticks_per_second;
    let script = ScriptedInput::new()
        .idle(s / 2)
        .hold(3 * s, MotionInput::drive(1.0, 0.0))
        .hold(3 * s / 2, MotionInput::drive(0.0, 1.0))
        .hold(2 * s, MotionInput::drive(1.0, 0.25))
        .idle(s)
        .at(s, ControlEvent::ToggleCleaning)
        .at(2 * s, ControlEvent::SpeedPreset(2))
        .at(4 * s, ControlEvent::ToggleCamera)
        .at(5 * s, ControlEvent::SpeedPreset(3))
        .at(6 * s, ControlEvent::ToggleCutting)
        .at(7 * s, ControlEvent::ToggleCutting);
    let end = script.len();
    script.at(end, ControlEvent::Exit)
}

fn run(config: &SimConfig) -> Result<()> {
    let ticks_per_second = (1.0 / config.sim.dt).round().max(1.0) as u64;
    let mut session = RobotSession::demo(config, demo_script(ticks_per_second))?;

    for _ in 0..config.sim.ticks {
        let outcome = session.step()?;

        let interval = config.sim.telemetry_interval;
        if interval > 0 && outcome.tick % interval == 0 {
            let frame = session.telemetry(&outcome.report);
            log::info!(
                "t={:>5} pos=[{:6.2} {:6.2} {:6.2}] n=[{:5.2} {:5.2} {:5.2}] rpy=[{:6.1} {:6.1} {:6.1}] rpm={:5.1} {:?}",
                outcome.tick,
                frame.position.x,
                frame.position.y,
                frame.position.z,
                frame.surface_normal.x,
                frame.surface_normal.y,
                frame.surface_normal.z,
                frame.attitude.roll,
                frame.attitude.pitch,
                frame.attitude.yaw,
                frame.motors.rpm,
                frame.mode,
            );
        }

        if session.exit_requested() {
            break;
        }
    }

    let tools = session.tools();
    log::info!(
        "Finished after {} ticks (cleaning: {}, cutting: {}, camera: {:?})",
        session.tick(),
        tools.cleaning_head_active(),
        tools.plasma_torch_active(),
        session.camera()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = parse_args();
    let config = match SimConfig::load(&args.config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("hull-sim starting");
    log::info!("  dt: {} s, ticks: {}", config.sim.dt, config.sim.ticks);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
