//! Mock capabilities for testing
//!
//! In-process stand-ins for the wire codec, power control and onboard status
//! source, so the aggregator can be driven end to end without a radio, a
//! dialect library or root privileges.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use link_telemetry::communication::mavlink::codec::Codec;
//! use link_telemetry::communication::mavlink::message::{TelemetryMessage, VersionData};
//! use link_telemetry::platform::mock::LoopbackCodec;
//! use mavlink::MavHeader;
//!
//! let codec = LoopbackCodec::new();
//! let message = TelemetryMessage::Version(VersionData::default());
//! let frame = codec.encode(MavHeader::default(), &message).unwrap();
//! let (_, decoded) = codec.decode(frame.as_bytes()).unwrap();
//! assert_eq!(decoded, message);
//! ```

#![cfg(any(test, feature = "mock"))]

mod codec;
mod onboard;
mod power;

pub use codec::LoopbackCodec;
pub use onboard::FixedOnboardStatus;
pub use power::RecordingPowerControl;
