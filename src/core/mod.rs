//! Core infrastructure
//!
//! Logging macros and the log accumulator shared between the log receiver and
//! the telemetry aggregator.

pub mod log_buffer;
pub mod logging;
