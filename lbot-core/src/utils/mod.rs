//! Utility re-exports for the line robot.
//!
//! - `hal`: hardware capability trait and a scripted simulator
//! - `config`: calibration constants and wait-loop limits
//! - `math`: drive, line and servo control math without hardware access
//! - `controllers`: the robot controller built on top of a `Hal`
//! - `connection`: TCP command channel (requires `std`)

pub mod config;
#[cfg(feature = "std")]
pub mod connection;
pub mod controllers;
pub mod hal;
pub mod math;

pub use config::RobotConfig;
pub use controllers::{RemoteCommand, RobotController, WaitOutcome};
pub use hal::{Hal, SimulatedHal};
pub use math::differential::MotorCommand;
