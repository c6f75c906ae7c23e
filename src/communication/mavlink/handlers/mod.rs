//! MAVLink Protocol Handlers
//!
//! # Handlers
//!
//! - **Command Interpreter**: PING, COMMAND_LONG (reboot/shutdown, REQUEST_MESSAGE)
//! - **Telemetry Builders**: ONBOARD_STATUS, WIFI_CARD, STATS_TOTAL_ALL_STREAMS,
//!   STATUSTEXT, VERSION

pub mod command;
pub mod telemetry;

// Re-export commonly used types
pub use command::{CommandInterpreter, InboundCommand};
