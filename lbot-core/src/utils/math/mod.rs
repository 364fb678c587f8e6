//! Control math for the line robot.
//!
//! Pure functions with no hardware access:
//! - `differential`: motor commands, turn timing and encoder targets
//! - `line`: sensor classification and proportional steering
//! - `interpolation`: gradual servo stepping

pub mod differential;
pub mod interpolation;
pub mod line;
