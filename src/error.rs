//! Error types for the telemetry endpoint.

use crate::communication::mavlink::codec::CodecError;
use crate::core::log_buffer::LogPayloadError;

/// Result type for fallible telemetry operations.
pub type Result<T> = core::result::Result<T, TelemetryError>;

/// Errors that can occur outside the infallible engine entry points.
///
/// `generate_outbound`, `process_inbound` and `on_bytes` never return these;
/// they log and skip instead.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Malformed log payload: {0}")]
    LogPayload(#[from] LogPayloadError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
