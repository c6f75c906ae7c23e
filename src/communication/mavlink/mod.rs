//! MAVLink Telemetry Endpoint
//!
//! # Architecture
//!
//! - **Message**: Closed set of messages sent or understood
//! - **Codec**: Injected pack/unpack capability
//! - **Identity**: Addressing and HEARTBEAT
//! - **Link stats**: Latest radio measurement, shared with the radio monitor
//! - **Handlers**: Command interpretation and message builders
//! - **Aggregator**: Poll-cycle composition and inbound routing
//!
//! # Usage
//!
//! ```ignore
//! let logs = Arc::new(LogAccumulator::new());
//! let link_stats = Arc::new(LinkStatsCache::new());
//! let aggregator = TelemetryAggregator::new(
//!     &TelemetryConfig::from_env()?,
//!     codec,
//!     SystemPowerControl::new(),
//!     Arc::clone(&link_stats),
//!     Arc::clone(&logs),
//! );
//!
//! loop {
//!     for frame in aggregator.generate_outbound() {
//!         transport.send(frame.as_bytes())?;
//!     }
//!     thread::sleep(Duration::from_secs(1));
//! }
//! ```

pub mod aggregator; // Poll-cycle orchestration
pub mod codec; // Codec capability
pub mod handlers; // Message handlers
pub mod identity; // Identity and heartbeat
pub mod link_stats; // Link statistics cache
pub mod message; // Message vocabulary

pub use aggregator::{AggregatorStats, TelemetryAggregator};
pub use codec::{Codec, CodecError, WireMessage};
pub use identity::{EndpointRole, Identity};
pub use link_stats::{LinkStats, LinkStatsCache};
pub use message::TelemetryMessage;
