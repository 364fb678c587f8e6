//! Robot controller.
//!
//! [`RobotController`] owns the HAL and the configuration. Its behaviour is
//! split by concern:
//!
//! - `motion`: differential drive primitives and timed turns
//! - `distance`: encoder and sensor threshold moves
//! - `line`: bang-bang and proportional line following
//! - `servo`: gradual joint moves and the startup pose
//! - `commands`: remote commands decoded from the command channel

pub mod commands;
pub mod distance;
pub mod line;
pub mod motion;
pub mod servo;

pub use commands::{CommandError, Maneuver, RemoteCommand};
pub use servo::Joint;

use crate::utils::{config::RobotConfig, hal::Hal};

/// How a threshold wait-loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The loop's stop condition held.
    Reached,
    /// The configured iteration bound ran out first.
    Exhausted { iterations: u32 },
}

impl WaitOutcome {
    pub fn reached(self) -> bool {
        self == WaitOutcome::Reached
    }
}

/// Drives a robot through a [`Hal`] using a fixed [`RobotConfig`].
pub struct RobotController<H> {
    hal: H,
    config: RobotConfig,
}

impl<H: Hal> RobotController<H> {
    pub fn new(
        hal: H,
        config: RobotConfig,
    ) -> Self {
        tracing::debug!(?config, "robot controller created");
        Self { hal, config }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    pub fn into_hal(self) -> H {
        self.hal
    }
}
