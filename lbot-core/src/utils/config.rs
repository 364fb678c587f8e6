//! Robot configuration.
//!
//! Every calibration constant the controllers use lives in [`RobotConfig`].
//! The defaults are the values measured on the reference robot; a JSON file
//! can override any subset of them since each group falls back to its
//! `Default` when missing.

use serde::{Deserialize, Serialize};

/// Immutable configuration injected into the controller at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub ports: Ports,
    pub drive: DriveCalibration,
    pub line: LineCalibration,
    pub servo: ServoCalibration,
    pub channel: ChannelConfig,
    pub limits: WaitLimits,
}

/// HAL port numbers for every sensor, motor and servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ports {
    pub sensor_left: u8,
    pub sensor_right: u8,
    pub distance_sensor: u8,
    pub motor_left: u8,
    pub motor_right: u8,
    pub servo_extender: u8,
    pub servo_arm: u8,
    pub servo_claw: u8,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            sensor_left: 0,
            sensor_right: 1,
            distance_sensor: 2,
            motor_left: 0,
            motor_right: 1,
            servo_extender: 0,
            servo_arm: 1,
            servo_claw: 2,
        }
    }
}

/// Differential drive calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveCalibration {
    /// Default speed used by the drive primitives, in [-100, 100].
    pub base_speed: i32,
    /// Encoder counts travelled per meter of forward motion (counts/m).
    ///
    /// Negative: the counters decrease while driving forward.
    pub encoder_counts_per_meter: f32,
    /// Fraction of the requested distance actually targeted, so encoder
    /// latency does not carry the robot past the mark.
    pub distance_undershoot: f32,
    /// Duration of a 180° open-loop turn at `turn_speed`, in ms.
    pub half_turn_ms: u32,
    /// Speed used by timed turns.
    pub turn_speed: i32,
}

impl Default for DriveCalibration {
    fn default() -> Self {
        Self {
            base_speed: 100,
            encoder_counts_per_meter: -9000.0,
            distance_undershoot: 0.95,
            half_turn_ms: 2275,
            turn_speed: 100,
        }
    }
}

/// Line sensor calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineCalibration {
    /// Readings at or above this value are black.
    pub black_threshold: i32,
    /// Proportional gain of the analog follower.
    pub kp: f32,
    /// Cadence of the intersection search loop, in ms.
    pub follow_tick_ms: u32,
    /// Pause after stopping on an intersection, in ms.
    pub intersection_dwell_ms: u32,
}

impl Default for LineCalibration {
    fn default() -> Self {
        Self {
            black_threshold: 2700,
            kp: 0.10,
            follow_tick_ms: 20,
            intersection_dwell_ms: 10_000,
        }
    }
}

/// Two named goals of a single joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPresets {
    /// Goal for the raised / opened pose.
    pub raised: i32,
    /// Goal for the lowered / closed pose.
    pub lowered: i32,
}

/// Servo stepping and preset goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoCalibration {
    /// Pause after each issued position, in ms.
    pub step_ms: u32,
    pub extender: JointPresets,
    pub arm: JointPresets,
    pub claw: JointPresets,
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self {
            step_ms: 1,
            extender: JointPresets {
                raised: 850,
                lowered: 1800,
            },
            arm: JointPresets {
                raised: 1800,
                lowered: 923,
            },
            claw: JointPresets {
                raised: 1000,
                lowered: 2047,
            },
        }
    }
}

/// TCP command channel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub port: u16,
    /// Pending connections the listener queues.
    pub backlog: i32,
    /// Maximum bytes returned by a single receive.
    pub recv_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            backlog: 3,
            recv_buffer: 1024,
        }
    }
}

/// How long a threshold wait-loop may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "n", rename_all = "snake_case")]
pub enum WaitPolicy {
    /// Loop until the condition holds.
    #[default]
    Forever,
    /// Give up after this many loop iterations.
    MaxIterations(u32),
}

impl WaitPolicy {
    /// True once `iterations` have used up the budget.
    pub fn exhausted(
        self,
        iterations: u32,
    ) -> bool {
        match self {
            WaitPolicy::Forever => false,
            WaitPolicy::MaxIterations(max) => iterations >= max,
        }
    }
}

/// Independent limits for each wait-loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitLimits {
    pub distance: WaitPolicy,
    pub sensor: WaitPolicy,
    pub intersection: WaitPolicy,
}
