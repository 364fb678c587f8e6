//! Differential drive math.
//!
//! Speeds are percentages in [-100, 100]; [`MotorCommand`] clamps on
//! construction so nothing outside that range ever reaches a motor.
//!
//! # Example
//! ```rust
//! use lbot_core::utils::math::differential::MotorCommand;
//! let cmd = MotorCommand::turn_right(100);
//! assert_eq!((cmd.left, cmd.right), (50, -100));
//! ```

use crate::utils::config::DriveCalibration;

/// Lowest speed a motor accepts.
pub const MIN_SPEED: i32 = -100;
/// Highest speed a motor accepts.
pub const MAX_SPEED: i32 = 100;

/// Clamp a speed into the motor range.
pub fn clamp_speed(speed: i32) -> i32 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Left and right wheel speeds for one control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCommand {
    pub left: i32,
    pub right: i32,
}

impl MotorCommand {
    /// Build a command, clamping both sides.
    pub fn new(
        left: i32,
        right: i32,
    ) -> Self {
        Self {
            left: clamp_speed(left),
            right: clamp_speed(right),
        }
    }

    pub fn forward(speed: i32) -> Self {
        Self::new(speed, speed)
    }

    /// Asymmetric pivot: the left wheel keeps half speed forward while the
    /// right wheel reverses.
    pub fn turn_right(speed: i32) -> Self {
        let speed = clamp_speed(speed);
        Self::new(speed.div_euclid(2), -speed)
    }

    /// Mirror of [`Self::turn_right`].
    pub fn turn_left(speed: i32) -> Self {
        let speed = clamp_speed(speed);
        Self::new(-speed, speed.div_euclid(2))
    }
}

/// Direction picked by an open-loop turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

/// Open-loop turn plan: which way and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedTurn {
    pub direction: TurnDirection,
    pub duration_ms: u32,
}

impl TimedTurn {
    /// Plan a turn of `degrees`; negative turns right, zero and positive turn
    /// left.
    pub fn plan(
        degrees: f32,
        cal: &DriveCalibration,
    ) -> Self {
        let per_degree_ms = (2.0 * cal.half_turn_ms as f32) / 360.0;
        let direction = if degrees < 0.0 {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        };
        Self {
            direction,
            duration_ms: libm::truncf(per_degree_ms * libm::fabsf(degrees)) as u32,
        }
    }
}

/// Encoder count a bounded move drives towards.
///
/// Counts fall while driving forward, so a move is unfinished while a
/// counter still sits above the target; [`EncoderTarget::remaining`] states
/// that as "remaining > 0".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderTarget {
    counts: f32,
}

impl EncoderTarget {
    /// Target for `meters`, including the undershoot margin.
    pub fn for_meters(
        meters: f32,
        cal: &DriveCalibration,
    ) -> Self {
        Self {
            counts: meters * cal.encoder_counts_per_meter * cal.distance_undershoot,
        }
    }

    /// Target for `centimeters`. The sign flips on the way to meters: a
    /// positive distance becomes a negative meter value.
    pub fn for_centimeters(
        centimeters: f32,
        cal: &DriveCalibration,
    ) -> Self {
        Self::for_meters(-centimeters / 100.0, cal)
    }

    pub fn counts(&self) -> f32 {
        self.counts
    }

    /// Counts still to travel from `position`; positive means keep moving.
    pub fn remaining(
        &self,
        position: i32,
    ) -> f32 {
        position as f32 - self.counts
    }

    /// True while either motor still has counts to travel.
    pub fn unfinished(
        &self,
        left: i32,
        right: i32,
    ) -> bool {
        self.remaining(left) > 0.0 || self.remaining(right) > 0.0
    }
}
