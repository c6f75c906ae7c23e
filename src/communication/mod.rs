//! Communication
//!
//! - **MAVLink**: message vocabulary, codec capability, link statistics,
//!   command interpretation and the telemetry aggregator
//! - **Log receiver**: localhost UDP intake for diagnostic text
//!
//! The radio transport itself is external; it hands inbound bytes to
//! [`mavlink::aggregator::TelemetryAggregator::on_bytes`] and writes every
//! outbound frame as-is.

pub mod log_receiver;
pub mod mavlink;
