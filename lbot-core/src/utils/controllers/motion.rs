//! Differential drive primitives and open-loop turns.

use super::RobotController;
use crate::utils::{
    hal::Hal,
    math::differential::{MotorCommand, TimedTurn, TurnDirection},
};

impl<H: Hal> RobotController<H> {
    /// Issue a power-mode command to both drive motors.
    pub fn drive(
        &mut self,
        command: MotorCommand,
    ) {
        let ports = self.config.ports;
        self.hal.drive_motor(ports.motor_left, command.left);
        self.hal.drive_motor(ports.motor_right, command.right);
    }

    /// Issue a velocity-mode command to both drive motors.
    pub fn drive_velocity(
        &mut self,
        command: MotorCommand,
    ) {
        let ports = self.config.ports;
        self.hal.drive_motor_velocity(ports.motor_left, command.left);
        self.hal.drive_motor_velocity(ports.motor_right, command.right);
    }

    pub fn forward(
        &mut self,
        speed: i32,
    ) {
        self.drive(MotorCommand::forward(speed));
    }

    pub fn turn_right(
        &mut self,
        speed: i32,
    ) {
        self.drive(MotorCommand::turn_right(speed));
    }

    pub fn turn_left(
        &mut self,
        speed: i32,
    ) {
        self.drive(MotorCommand::turn_left(speed));
    }

    /// Stop every motor.
    pub fn stop(&mut self) {
        self.hal.all_off();
    }

    /// Timed turn without heading feedback; negative degrees turn right.
    ///
    /// Accuracy depends only on the half-turn calibration and floor friction.
    pub fn turn_deg(
        &mut self,
        degrees: f32,
    ) {
        let drive = self.config.drive;
        let turn = TimedTurn::plan(degrees, &drive);
        tracing::info!(degrees, duration_ms = turn.duration_ms, "timed turn");
        match turn.direction {
            TurnDirection::Right => self.turn_right(drive.turn_speed),
            TurnDirection::Left => self.turn_left(drive.turn_speed),
        }
        self.hal.sleep_ms(turn.duration_ms);
        self.stop();
    }

    pub fn turn_around(&mut self) {
        self.turn_deg(180.0);
    }
}
