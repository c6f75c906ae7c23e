//! link_telemetry - Onboard telemetry endpoint for a companion computer
//!
//! Aggregates heartbeat, onboard health, radio link statistics and local log
//! text into a bounded outbound MAVLink stream, and interprets the few inbound
//! commands the endpoint answers (ping, reboot/shutdown, on-demand messages).
//!
//! The wire codec and the radio transport are supplied by the host process.

// Logging macros and log accumulation
pub mod core;

// Host capabilities (onboard status, power control)
pub mod platform;

// MAVLink endpoint and local log intake
pub mod communication;

pub mod config;
pub mod error;

pub use config::TelemetryConfig;
pub use error::{Result, TelemetryError};
