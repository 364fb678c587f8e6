//! Module Exports
//!
//! TCP command channel of the robot.
//!
//! # Modules
//! - `channel`: non-blocking listener, outbound connect and raw text messages.

/// Module for the TCP listener and message exchange.
pub mod channel;

pub use channel::{
    connect_with, create_server, get_message, send_message, ChannelError, CommandServer,
    Connection,
};
