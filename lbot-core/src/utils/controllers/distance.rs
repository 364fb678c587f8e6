//! Threshold moves: drive until an encoder target or a sensor value is hit.
//!
//! `step` is any drive primitive, called once per loop iteration with the
//! requested speed, e.g. `RobotController::forward`.

use super::{RobotController, WaitOutcome};
use crate::utils::{config::WaitPolicy, hal::Hal, math::differential::EncoderTarget};

impl<H: Hal> RobotController<H> {
    /// Drive until both encoders pass the target for `meters`.
    ///
    /// The target undershoots the distance by the configured margin.
    pub fn move_for_m<F>(
        &mut self,
        meters: f32,
        speed: i32,
        step: F,
    ) -> WaitOutcome
    where
        F: FnMut(&mut Self, i32),
    {
        let target = EncoderTarget::for_meters(meters, &self.config.drive);
        self.move_to_target(target, speed, step)
    }

    /// Same as [`Self::move_for_m`] with the distance in centimeters; a
    /// positive value maps to negative meters.
    pub fn move_for_cm<F>(
        &mut self,
        centimeters: f32,
        speed: i32,
        step: F,
    ) -> WaitOutcome
    where
        F: FnMut(&mut Self, i32),
    {
        let target = EncoderTarget::for_centimeters(centimeters, &self.config.drive);
        self.move_to_target(target, speed, step)
    }

    fn move_to_target<F>(
        &mut self,
        target: EncoderTarget,
        speed: i32,
        mut step: F,
    ) -> WaitOutcome
    where
        F: FnMut(&mut Self, i32),
    {
        let ports = self.config.ports;
        self.hal.clear_motor_position(ports.motor_left);
        self.hal.clear_motor_position(ports.motor_right);
        tracing::info!(target_counts = target.counts(), speed, "encoder move");

        let outcome = self.wait_while(self.config.limits.distance, speed, &mut step, |robot| {
            let left = robot.hal.motor_position(ports.motor_left);
            let right = robot.hal.motor_position(ports.motor_right);
            target.unfinished(left, right)
        });
        self.stop();
        outcome
    }

    /// Drive while the distance sensor reads below `threshold`.
    pub fn move_until_distance_sensor<F>(
        &mut self,
        threshold: i32,
        speed: i32,
        mut step: F,
    ) -> WaitOutcome
    where
        F: FnMut(&mut Self, i32),
    {
        let port = self.config.ports.distance_sensor;
        tracing::info!(threshold, speed, "distance sensor move");
        let outcome = self.wait_while(self.config.limits.sensor, speed, &mut step, |robot| {
            robot.hal.read_analog(port) < threshold
        });
        self.stop();
        outcome
    }

    /// Run `step` while `pending` holds, bounded by `policy`.
    fn wait_while<F, P>(
        &mut self,
        policy: WaitPolicy,
        speed: i32,
        step: &mut F,
        mut pending: P,
    ) -> WaitOutcome
    where
        F: FnMut(&mut Self, i32),
        P: FnMut(&mut Self) -> bool,
    {
        let mut iterations = 0u32;
        while pending(self) {
            if policy.exhausted(iterations) {
                tracing::warn!(iterations, "wait loop exhausted before its condition held");
                return WaitOutcome::Exhausted { iterations };
            }
            step(self, speed);
            iterations = iterations.saturating_add(1);
        }
        tracing::debug!(iterations, "wait loop reached");
        WaitOutcome::Reached
    }
}
