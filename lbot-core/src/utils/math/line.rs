//! Line sensor math.
//!
//! A single fixed threshold splits raw readings into white and black; there
//! is no hysteresis and no per-sensor calibration.

use super::differential::MotorCommand;

/// Binary reading of a line sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    White,
    Black,
}

impl Classification {
    pub fn classify(
        reading: i32,
        black_threshold: i32,
    ) -> Self {
        if reading >= black_threshold {
            Classification::Black
        } else {
            Classification::White
        }
    }

    pub fn is_black(self) -> bool {
        self == Classification::Black
    }
}

/// Raw readings of both line sensors taken in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineReading {
    pub left: i32,
    pub right: i32,
}

impl LineReading {
    pub fn classify(
        self,
        black_threshold: i32,
    ) -> (Classification, Classification) {
        (
            Classification::classify(self.left, black_threshold),
            Classification::classify(self.right, black_threshold),
        )
    }

    /// Both sensors over the line at once.
    pub fn at_intersection(
        self,
        black_threshold: i32,
    ) -> bool {
        let (left, right) = self.classify(black_threshold);
        left.is_black() && right.is_black()
    }
}

/// Bang-bang steering decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Forward,
    Right,
    Left,
}

impl Steer {
    /// Both black falls back to forward; it is not treated as an
    /// intersection here.
    pub fn from_classes(
        left: Classification,
        right: Classification,
    ) -> Self {
        use Classification::*;
        match (left, right) {
            (White, White) => Steer::Forward,
            (White, Black) => Steer::Right,
            (Black, White) => Steer::Left,
            (Black, Black) => Steer::Forward,
        }
    }

    pub fn command(
        self,
        speed: i32,
    ) -> MotorCommand {
        match self {
            Steer::Forward => MotorCommand::forward(speed),
            Steer::Right => MotorCommand::turn_right(speed),
            Steer::Left => MotorCommand::turn_left(speed),
        }
    }
}

/// Proportional steering correction, truncated toward zero.
///
/// For negative error this can sit one above `floor`; truncation keeps the
/// correction symmetric around zero.
pub fn correction(
    reading: LineReading,
    kp: f32,
) -> i32 {
    let error = reading.left.saturating_sub(reading.right);
    libm::truncf(kp * error as f32) as i32
}

/// Proportional follower output: the correction slows the darker side.
pub fn proportional_command(
    reading: LineReading,
    base_speed: i32,
    kp: f32,
) -> MotorCommand {
    let c = correction(reading, kp);
    MotorCommand::new(base_speed.saturating_sub(c), base_speed.saturating_add(c))
}
