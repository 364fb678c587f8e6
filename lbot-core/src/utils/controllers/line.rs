//! Line following.
//!
//! `follow_line` and `follow_line_proportional` are single ticks; the caller
//! repeats them. `follow_line_until_intersection` owns its loop.

use super::{RobotController, WaitOutcome};
use crate::utils::{
    hal::Hal,
    math::line::{proportional_command, Classification, LineReading, Steer},
};

impl<H: Hal> RobotController<H> {
    /// Read both line sensors.
    pub fn read_line(&mut self) -> LineReading {
        let ports = self.config.ports;
        LineReading {
            left: self.hal.read_analog(ports.sensor_left),
            right: self.hal.read_analog(ports.sensor_right),
        }
    }

    pub fn is_black(
        &mut self,
        port: u8,
    ) -> bool {
        let reading = self.hal.read_analog(port);
        Classification::classify(reading, self.config.line.black_threshold).is_black()
    }

    pub fn is_white(
        &mut self,
        port: u8,
    ) -> bool {
        !self.is_black(port)
    }

    /// One bang-bang tick.
    pub fn follow_line(
        &mut self,
        speed: i32,
    ) {
        let reading = self.read_line();
        self.steer(reading, speed);
    }

    fn steer(
        &mut self,
        reading: LineReading,
        speed: i32,
    ) {
        let (left, right) = reading.classify(self.config.line.black_threshold);
        let steer = Steer::from_classes(left, right);
        tracing::debug!(?reading, ?steer, "line tick");
        self.drive(steer.command(speed));
    }

    /// Follow the line every tick until both sensors see black together,
    /// then stop and dwell.
    ///
    /// One sensor on black keeps the robot following. Each tick reads the
    /// sensors once and steers on that same reading.
    pub fn follow_line_until_intersection(
        &mut self,
        speed: i32,
    ) -> WaitOutcome {
        let line = self.config.line;
        let policy = self.config.limits.intersection;
        let mut ticks = 0u32;
        loop {
            let reading = self.read_line();
            if reading.at_intersection(line.black_threshold) {
                break;
            }
            if policy.exhausted(ticks) {
                tracing::warn!(ticks, "no intersection found");
                self.stop();
                return WaitOutcome::Exhausted { iterations: ticks };
            }
            self.steer(reading, speed);
            self.hal.sleep_ms(line.follow_tick_ms);
            ticks = ticks.saturating_add(1);
        }
        tracing::info!(ticks, "intersection reached");
        self.stop();
        self.hal.sleep_ms(line.intersection_dwell_ms);
        WaitOutcome::Reached
    }

    /// One proportional tick on the raw readings.
    pub fn follow_line_proportional(
        &mut self,
        speed: i32,
    ) {
        let reading = self.read_line();
        let command = proportional_command(reading, speed, self.config.line.kp);
        tracing::debug!(?reading, ?command, "proportional tick");
        self.drive(command);
    }
}
