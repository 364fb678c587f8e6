//! Motion and actuator control core for a line-following pick robot.
//!
//! The control algorithms only talk to hardware through the [`utils::hal::Hal`]
//! trait, so they run unchanged against the robot's controller board or the
//! bundled [`utils::hal::SimulatedHal`].
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod utils;
