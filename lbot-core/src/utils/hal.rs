//! Hardware capability used by the controllers.
//!
//! [`Hal`] is the whole hardware surface of the robot: analog sensors, two
//! drive motors with encoders, servos and a millisecond delay. Calls are
//! assumed to always succeed, as they map to direct register access on the
//! controller board.
//!
//! [`SimulatedHal`] implements the trait against scripted sensor readings and
//! a simple encoder model, and records every side effect so tests can assert
//! on the exact command sequence.

use alloc::{collections::VecDeque, vec::Vec};

use embedded_hal::delay::DelayNs;

/// Raw hardware primitives of the robot.
pub trait Hal {
    /// Raw intensity of an analog sensor.
    fn read_analog(
        &mut self,
        port: u8,
    ) -> i32;

    /// Drive a motor in power mode, `speed` in [-100, 100].
    fn drive_motor(
        &mut self,
        port: u8,
        speed: i32,
    );

    /// Drive a motor in velocity mode, `velocity` in [-100, 100].
    fn drive_motor_velocity(
        &mut self,
        port: u8,
        velocity: i32,
    );

    /// Reset a motor's encoder counter to zero.
    fn clear_motor_position(
        &mut self,
        port: u8,
    );

    /// Current encoder count of a motor.
    fn motor_position(
        &mut self,
        port: u8,
    ) -> i32;

    /// Block for `ms` milliseconds.
    fn sleep_ms(
        &mut self,
        ms: u32,
    );

    /// Stop every motor immediately.
    fn all_off(&mut self);

    /// Power the servo outputs.
    fn enable_servos(&mut self);

    /// Last position reported by a servo.
    fn servo_position(
        &mut self,
        port: u8,
    ) -> i32;

    /// Command a servo position.
    fn set_servo_position(
        &mut self,
        port: u8,
        position: i32,
    );
}

/// Side effect recorded by [`SimulatedHal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalEvent {
    Motor { port: u8, speed: i32 },
    MotorVelocity { port: u8, velocity: i32 },
    ClearPosition { port: u8 },
    Sleep { ms: u32 },
    AllOff,
    EnableServos,
    Servo { port: u8, position: i32 },
}

/// Ports per kind of device on the controller board.
pub const PORTS: usize = 8;

/// Scripted and recording HAL.
///
/// Analog reads pop from a per-port script; the last scripted value sticks.
/// Each motor command moves that motor's encoder by
/// `-(speed * encoder_rate) / 100`, so driving forward counts down. Counters
/// wrap like the hardware ones.
///
/// Only ports below [`PORTS`] are modelled: reads on other ports return 0 and
/// writes to them are recorded but otherwise ignored.
pub struct SimulatedHal<D> {
    delay: D,
    analog: [VecDeque<i32>; PORTS],
    encoders: [i32; PORTS],
    servos: [i32; PORTS],
    encoder_rate: i32,
    servos_enabled: bool,
    events: Vec<HalEvent>,
}

impl<D: DelayNs> SimulatedHal<D> {
    /// Create a simulator with unscripted sensors, frozen encoders and all
    /// servos at position 0.
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            analog: Default::default(),
            encoders: [0; PORTS],
            servos: [0; PORTS],
            encoder_rate: 0,
            servos_enabled: false,
            events: Vec::new(),
        }
    }

    /// Encoder counts per full-speed motor command.
    pub fn with_encoder_rate(
        mut self,
        rate: i32,
    ) -> Self {
        self.encoder_rate = rate;
        self
    }

    /// Queue readings for an analog port.
    pub fn script_analog<I>(
        &mut self,
        port: u8,
        readings: I,
    ) where
        I: IntoIterator<Item = i32>,
    {
        if let Some(script) = self.analog.get_mut(port as usize) {
            script.extend(readings);
        }
    }

    /// Place a servo at a position without recording a command.
    pub fn place_servo(
        &mut self,
        port: u8,
        position: i32,
    ) {
        if let Some(servo) = self.servos.get_mut(port as usize) {
            *servo = position;
        }
    }

    /// Override an encoder count without recording a command.
    pub fn place_encoder(
        &mut self,
        port: u8,
        count: i32,
    ) {
        if let Some(encoder) = self.encoders.get_mut(port as usize) {
            *encoder = count;
        }
    }

    pub fn servos_enabled(&self) -> bool {
        self.servos_enabled
    }

    /// Every side effect since creation or the last [`Self::take_events`].
    pub fn events(&self) -> &[HalEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<HalEvent> {
        core::mem::take(&mut self.events)
    }

    /// Positions commanded to one servo, in order.
    pub fn servo_trace(
        &self,
        port: u8,
    ) -> Vec<i32> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                HalEvent::Servo { port: p, position } if p == port => Some(position),
                _ => None,
            })
            .collect()
    }

    /// Power-mode commands issued as `(left, right)` pairs.
    pub fn motor_pairs(
        &self,
        left: u8,
        right: u8,
    ) -> Vec<(i32, i32)> {
        let mut pairs = Vec::new();
        let mut pending = None;
        for event in &self.events {
            if let HalEvent::Motor { port, speed } = *event {
                if port == left {
                    pending = Some(speed);
                } else if port == right {
                    if let Some(l) = pending.take() {
                        pairs.push((l, speed));
                    }
                }
            }
        }
        pairs
    }

    /// Total milliseconds requested through `sleep_ms`.
    pub fn slept_ms(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match *e {
                HalEvent::Sleep { ms } => ms as u64,
                _ => 0,
            })
            .sum()
    }

    fn advance_encoder(
        &mut self,
        port: u8,
        speed: i32,
    ) {
        let step = speed.saturating_mul(self.encoder_rate) / 100;
        if let Some(encoder) = self.encoders.get_mut(port as usize) {
            *encoder = encoder.wrapping_sub(step);
        }
    }
}

impl<D: DelayNs> Hal for SimulatedHal<D> {
    fn read_analog(
        &mut self,
        port: u8,
    ) -> i32 {
        let Some(script) = self.analog.get_mut(port as usize) else {
            return 0;
        };
        if script.len() > 1 {
            script.pop_front().unwrap_or_default()
        } else {
            script.front().copied().unwrap_or_default()
        }
    }

    fn drive_motor(
        &mut self,
        port: u8,
        speed: i32,
    ) {
        self.advance_encoder(port, speed);
        self.events.push(HalEvent::Motor { port, speed });
    }

    fn drive_motor_velocity(
        &mut self,
        port: u8,
        velocity: i32,
    ) {
        self.advance_encoder(port, velocity);
        self.events.push(HalEvent::MotorVelocity { port, velocity });
    }

    fn clear_motor_position(
        &mut self,
        port: u8,
    ) {
        if let Some(encoder) = self.encoders.get_mut(port as usize) {
            *encoder = 0;
        }
        self.events.push(HalEvent::ClearPosition { port });
    }

    fn motor_position(
        &mut self,
        port: u8,
    ) -> i32 {
        self.encoders.get(port as usize).copied().unwrap_or_default()
    }

    fn sleep_ms(
        &mut self,
        ms: u32,
    ) {
        self.delay.delay_ms(ms);
        self.events.push(HalEvent::Sleep { ms });
    }

    fn all_off(&mut self) {
        self.events.push(HalEvent::AllOff);
    }

    fn enable_servos(&mut self) {
        self.servos_enabled = true;
        self.events.push(HalEvent::EnableServos);
    }

    fn servo_position(
        &mut self,
        port: u8,
    ) -> i32 {
        self.servos.get(port as usize).copied().unwrap_or_default()
    }

    fn set_servo_position(
        &mut self,
        port: u8,
        position: i32,
    ) {
        if let Some(servo) = self.servos.get_mut(port as usize) {
            *servo = position;
        }
        self.events.push(HalEvent::Servo { port, position });
    }
}
