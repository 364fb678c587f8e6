//! Pick arm joints.
//!
//! Every joint moves gradually, one position unit per step with a short
//! pause, towards one of its two preset goals.

use serde::{Deserialize, Serialize};

use super::RobotController;
use crate::utils::{
    config::{JointPresets, RobotConfig},
    hal::Hal,
    math::interpolation::gradual_steps,
};

/// The three servo-driven joints of the pick arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Extender,
    Arm,
    Claw,
}

impl Joint {
    pub fn port(
        self,
        config: &RobotConfig,
    ) -> u8 {
        match self {
            Joint::Extender => config.ports.servo_extender,
            Joint::Arm => config.ports.servo_arm,
            Joint::Claw => config.ports.servo_claw,
        }
    }

    pub fn presets(
        self,
        config: &RobotConfig,
    ) -> JointPresets {
        match self {
            Joint::Extender => config.servo.extender,
            Joint::Arm => config.servo.arm,
            Joint::Claw => config.servo.claw,
        }
    }
}

impl<H: Hal> RobotController<H> {
    /// Step a servo port from its reported position towards `goal`.
    ///
    /// The goal itself is never issued; the last position sent is one unit
    /// short of it. Nothing is sent when already at the goal.
    pub fn set_servo_position_gradual(
        &mut self,
        port: u8,
        goal: i32,
    ) {
        let current = self.hal.servo_position(port);
        let step_ms = self.config.servo.step_ms;
        let steps = gradual_steps(current, goal);
        tracing::debug!(port, current, goal, steps = steps.len(), "gradual servo move");
        for position in steps {
            self.hal.set_servo_position(port, position);
            self.hal.sleep_ms(step_ms);
        }
    }

    /// Move a joint to its raised (`true`) or lowered preset.
    pub fn move_joint(
        &mut self,
        joint: Joint,
        raised: bool,
    ) {
        let presets = joint.presets(&self.config);
        let goal = if raised { presets.raised } else { presets.lowered };
        tracing::info!(?joint, goal, "joint move");
        self.set_servo_position_gradual(joint.port(&self.config), goal);
    }

    pub fn extender_up(&mut self) {
        self.move_joint(Joint::Extender, true);
    }

    pub fn extender_down(&mut self) {
        self.move_joint(Joint::Extender, false);
    }

    pub fn lift_arm(&mut self) {
        self.move_joint(Joint::Arm, true);
    }

    pub fn lower_arm(&mut self) {
        self.move_joint(Joint::Arm, false);
    }

    pub fn open_claw(&mut self) {
        self.move_joint(Joint::Claw, true);
    }

    pub fn close_claw(&mut self) {
        self.move_joint(Joint::Claw, false);
    }

    /// Power the servos and move into the safe startup pose: extender high,
    /// arm up, claw open.
    pub fn start_servos(&mut self) {
        self.hal.enable_servos();
        self.extender_up();
        self.lift_arm();
        self.open_claw();
    }
}
