//! Mock wire codec

use crate::communication::mavlink::codec::{Codec, CodecError, WireMessage};
use crate::communication::mavlink::message::TelemetryMessage;
use mavlink::MavHeader;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Loopback codec
///
/// Every encoded message is kept in memory and the frame is its index
/// (4 bytes, little endian). Decoding a frame returns the stored header and
/// message, so tests can inspect exactly what the aggregator produced and
/// feed frames back in as inbound traffic.
#[derive(Debug, Default)]
pub struct LoopbackCodec {
    encoded: Mutex<Vec<(MavHeader, TelemetryMessage)>>,
    failing_ids: Mutex<Vec<u32>>,
}

impl LoopbackCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn encoded(&self) -> MutexGuard<'_, Vec<(MavHeader, TelemetryMessage)>> {
        self.encoded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later `encode` of `msg_id` fail (for test setup)
    pub fn fail_encoding(&self, msg_id: u32) {
        self.failing_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(msg_id);
    }

    /// Number of messages encoded so far
    pub fn encoded_count(&self) -> usize {
        self.encoded().len()
    }

    /// Build an inbound frame as if `message` arrived from `header`
    pub fn inbound(&self, header: MavHeader, message: TelemetryMessage) -> WireMessage {
        let msg_id = message.message_id();
        let mut encoded = self.encoded();
        let index = encoded.len() as u32;
        encoded.push((header, message));
        WireMessage::new(msg_id, index.to_le_bytes().to_vec())
    }
}

impl Codec for LoopbackCodec {
    fn encode(
        &self,
        header: MavHeader,
        message: &TelemetryMessage,
    ) -> Result<WireMessage, CodecError> {
        let failing = self
            .failing_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&message.message_id());
        if failing {
            return Err(CodecError::Unsupported(message.name()));
        }
        Ok(self.inbound(header, message.clone()))
    }

    fn decode(&self, frame: &[u8]) -> Result<(MavHeader, TelemetryMessage), CodecError> {
        let bytes: [u8; 4] = frame
            .try_into()
            .map_err(|_| CodecError::Malformed("loopback frame must be 4 bytes"))?;
        let index = u32::from_le_bytes(bytes) as usize;
        self.encoded()
            .get(index)
            .cloned()
            .ok_or(CodecError::Malformed("unknown loopback frame"))
    }
}
