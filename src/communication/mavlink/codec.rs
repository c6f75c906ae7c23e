//! Wire Codec Capability
//!
//! The engine never packs bytes itself. It hands a [`TelemetryMessage`] and a
//! MAVLink header to a [`Codec`] and gets back a [`WireMessage`], one discrete
//! frame the transport writes as-is. Inbound frames go the other way.
//!
//! The codec is supplied by the hosting process (generated dialect bindings,
//! a C library wrapper, ...). `platform::mock::LoopbackCodec` is the in-process
//! implementation used by tests.

use super::message::TelemetryMessage;
use mavlink::MavHeader;
use std::sync::Arc;

/// One encoded frame tagged with its message id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    msg_id: u32,
    frame: Vec<u8>,
}

impl WireMessage {
    /// Wrap an encoded frame. Called by codec implementations.
    pub fn new(msg_id: u32, frame: Vec<u8>) -> Self {
        Self { msg_id, frame }
    }

    /// Message id assigned by the codec
    pub fn msg_id(&self) -> u32 {
        self.msg_id
    }

    /// Encoded frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.frame
    }

    /// Consume into the frame bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.frame
    }
}

/// Codec failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed frame: {0}")]
    Malformed(&'static str),

    #[error("unknown message id {0}")]
    UnknownMessageId(u32),

    #[error("message {0} cannot be encoded")]
    Unsupported(&'static str),
}

/// Pack/unpack capability keyed by message id
///
/// Implementations must be callable from the poll thread and the receive
/// thread at the same time.
pub trait Codec: Send + Sync {
    /// Encode `message` under `header` into one frame
    fn encode(&self, header: MavHeader, message: &TelemetryMessage)
        -> Result<WireMessage, CodecError>;

    /// Decode one frame into its header and message
    fn decode(&self, frame: &[u8]) -> Result<(MavHeader, TelemetryMessage), CodecError>;
}

impl<C: Codec + ?Sized> Codec for Arc<C> {
    fn encode(
        &self,
        header: MavHeader,
        message: &TelemetryMessage,
    ) -> Result<WireMessage, CodecError> {
        (**self).encode(header, message)
    }

    fn decode(&self, frame: &[u8]) -> Result<(MavHeader, TelemetryMessage), CodecError> {
        (**self).decode(frame)
    }
}
