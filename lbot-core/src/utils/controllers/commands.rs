//! Remote commands.
//!
//! Commands arrive as JSON text over the command channel and are tagged with
//! `"rc"`, e.g. `{"rc":"move_cm","cm":30.0,"s":80,"via":"forward"}`.
//! Decoding and execution are separate so the transport stays independent of
//! the motion stack.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Joint, RobotController, WaitOutcome};
use crate::utils::hal::Hal;

/// Drive primitive a threshold move repeats each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Forward,
    TurnLeft,
    TurnRight,
    FollowLine,
    FollowLineProportional,
}

impl Maneuver {
    pub fn apply<H: Hal>(
        self,
        robot: &mut RobotController<H>,
        speed: i32,
    ) {
        match self {
            Maneuver::Forward => robot.forward(speed),
            Maneuver::TurnLeft => robot.turn_left(speed),
            Maneuver::TurnRight => robot.turn_right(speed),
            Maneuver::FollowLine => robot.follow_line(speed),
            Maneuver::FollowLineProportional => robot.follow_line_proportional(speed),
        }
    }
}

/// Command variants accepted over the channel.
///
/// Serialized as JSON with tag `"rc"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rc", rename_all = "snake_case")]
pub enum RemoteCommand {
    // Drive Variants
    Forward { s: i32 },
    TurnLeft { s: i32 },
    TurnRight { s: i32 },
    /// Timed turn, negative degrees turn right.
    TurnDeg { d: f32 },
    TurnAround,
    Stop,

    // Threshold Move Variants
    MoveCm { cm: f32, s: i32, via: Maneuver },
    MoveM { meters: f32, s: i32, via: Maneuver },
    /// Move while the distance sensor reads below `t`.
    MoveUntilDistance { t: i32, s: i32, via: Maneuver },

    // Line Variants
    FollowLine { s: i32 },
    FollowLineProportional { s: i32 },
    FollowToIntersection { s: i32 },

    // Arm Variants
    Joint { j: Joint, raised: bool },
    ExtenderUp,
    ExtenderDown,
    LiftArm,
    LowerArm,
    OpenClaw,
    CloseClaw,
    StartServos,
}

/// Errors decoding a remote command.
#[derive(Debug)]
pub enum CommandError {
    Decode(serde_json::Error),
}

impl fmt::Display for CommandError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            CommandError::Decode(e) => write!(f, "invalid command: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Decode(e)
    }
}

impl RemoteCommand {
    /// Decode one message; surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(text.trim())?)
    }
}

impl<H: Hal> RobotController<H> {
    /// Run a decoded command to completion.
    ///
    /// Wait-loop commands report their outcome; everything else is
    /// `Reached` once issued.
    pub fn execute(
        &mut self,
        command: RemoteCommand,
    ) -> WaitOutcome {
        tracing::info!(?command, "executing remote command");
        match command {
            RemoteCommand::Forward { s } => self.forward(s),
            RemoteCommand::TurnLeft { s } => self.turn_left(s),
            RemoteCommand::TurnRight { s } => self.turn_right(s),
            RemoteCommand::TurnDeg { d } => self.turn_deg(d),
            RemoteCommand::TurnAround => self.turn_around(),
            RemoteCommand::Stop => self.stop(),
            RemoteCommand::MoveCm { cm, s, via } => {
                return self.move_for_cm(cm, s, |robot, speed| via.apply(robot, speed));
            }
            RemoteCommand::MoveM { meters, s, via } => {
                return self.move_for_m(meters, s, |robot, speed| via.apply(robot, speed));
            }
            RemoteCommand::MoveUntilDistance { t, s, via } => {
                return self
                    .move_until_distance_sensor(t, s, |robot, speed| via.apply(robot, speed));
            }
            RemoteCommand::FollowLine { s } => self.follow_line(s),
            RemoteCommand::FollowLineProportional { s } => self.follow_line_proportional(s),
            RemoteCommand::FollowToIntersection { s } => {
                return self.follow_line_until_intersection(s);
            }
            RemoteCommand::Joint { j, raised } => self.move_joint(j, raised),
            RemoteCommand::ExtenderUp => self.extender_up(),
            RemoteCommand::ExtenderDown => self.extender_down(),
            RemoteCommand::LiftArm => self.lift_arm(),
            RemoteCommand::LowerArm => self.lower_arm(),
            RemoteCommand::OpenClaw => self.open_claw(),
            RemoteCommand::CloseClaw => self.close_claw(),
            RemoteCommand::StartServos => self.start_servos(),
        }
        WaitOutcome::Reached
    }
}
