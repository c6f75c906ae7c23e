//! Log Accumulator
//!
//! Collects diagnostic text produced by local processes and hands it to the
//! telemetry aggregator a few entries at a time.
//!
//! ## Features
//!
//! - Fixed capacity of 64 entries (heapless Deque, no per-entry allocation)
//! - Oldest-first eviction when full, with a warning and a drop counter
//! - Destructive FIFO retrieval: an entry is handed out exactly once
//! - Thread-safe: `ingest` runs on the receive thread, `drain` on the poll thread
//!
//! ## Payload format
//!
//! One datagram carries one record:
//!
//! ```text
//! +----------+-------------------------------------------+
//! | severity |  text (UTF-8, NUL padded, <= 50 bytes kept) |
//! +----------+-------------------------------------------+
//!    1 byte                  1..N bytes
//! ```
//!
//! Severity uses the MAVLink scale (0 = emergency .. 7 = debug).

use heapless::{Deque, String, Vec};
use mavlink::common::MavSeverity;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Queue ceiling in number of entries
pub const LOG_QUEUE_CAPACITY: usize = 64;

/// Maximum text length in bytes (one STATUSTEXT payload)
pub const LOG_TEXT_LEN: usize = 50;

/// Encoded payload size: severity byte plus padded text
pub const LOG_PAYLOAD_LEN: usize = LOG_TEXT_LEN + 1;

/// Reasons a raw log payload is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LogPayloadError {
    #[error("payload is empty")]
    Empty,
    #[error("unknown severity {0}")]
    UnknownSeverity(u8),
    #[error("payload carries no text")]
    EmptyText,
    #[error("text contains no valid UTF-8")]
    InvalidUtf8,
}

/// One accumulated log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub severity: MavSeverity,
    pub text: String<LOG_TEXT_LEN>,
}

impl LogEntry {
    /// Create an entry, truncating `text` to [`LOG_TEXT_LEN`] bytes on a char boundary
    pub fn new(severity: MavSeverity, text: &str) -> Self {
        let mut bounded = String::new();
        let _ = bounded.push_str(truncate_to_boundary(text, LOG_TEXT_LEN));
        Self {
            severity,
            text: bounded,
        }
    }

    /// Encode this entry in the local payload format
    pub fn to_payload(&self) -> Vec<u8, LOG_PAYLOAD_LEN> {
        let mut payload = Vec::new();
        let _ = payload.push(severity_to_u8(self.severity));
        let _ = payload.extend_from_slice(self.text.as_bytes());
        while !payload.is_full() {
            let _ = payload.push(0);
        }
        payload
    }
}

/// Parse one raw datagram into a [`LogEntry`]
///
/// Only the first [`LOG_TEXT_LEN`] text bytes are looked at, so bytes past the
/// kept window never cause a rejection. A character split by the cut is
/// dropped and invalid bytes inside the window become U+FFFD.
pub fn parse_log_payload(raw: &[u8]) -> Result<LogEntry, LogPayloadError> {
    let (&level, body) = raw.split_first().ok_or(LogPayloadError::Empty)?;
    let severity = severity_from_u8(level).ok_or(LogPayloadError::UnknownSeverity(level))?;

    // Text ends at the first NUL
    let body = match body.iter().position(|&b| b == 0) {
        Some(end) => &body[..end],
        None => body,
    };
    let window = &body[..body.len().min(LOG_TEXT_LEN)];
    let window = match core::str::from_utf8(window) {
        Err(e) if e.error_len().is_none() => &window[..e.valid_up_to()],
        _ => window,
    };

    let text = std::string::String::from_utf8_lossy(window);
    if !text.is_empty() && text.chars().all(|c| c == char::REPLACEMENT_CHARACTER) {
        return Err(LogPayloadError::InvalidUtf8);
    }
    let text = text.trim_end_matches(['\n', '\r']);
    if text.is_empty() {
        return Err(LogPayloadError::EmptyText);
    }

    Ok(LogEntry::new(severity, text))
}

fn truncate_to_boundary(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn severity_from_u8(level: u8) -> Option<MavSeverity> {
    let severity = match level {
        0 => MavSeverity::MAV_SEVERITY_EMERGENCY,
        1 => MavSeverity::MAV_SEVERITY_ALERT,
        2 => MavSeverity::MAV_SEVERITY_CRITICAL,
        3 => MavSeverity::MAV_SEVERITY_ERROR,
        4 => MavSeverity::MAV_SEVERITY_WARNING,
        5 => MavSeverity::MAV_SEVERITY_NOTICE,
        6 => MavSeverity::MAV_SEVERITY_INFO,
        7 => MavSeverity::MAV_SEVERITY_DEBUG,
        _ => return None,
    };
    Some(severity)
}

fn severity_to_u8(severity: MavSeverity) -> u8 {
    match severity {
        MavSeverity::MAV_SEVERITY_EMERGENCY => 0,
        MavSeverity::MAV_SEVERITY_ALERT => 1,
        MavSeverity::MAV_SEVERITY_CRITICAL => 2,
        MavSeverity::MAV_SEVERITY_ERROR => 3,
        MavSeverity::MAV_SEVERITY_WARNING => 4,
        MavSeverity::MAV_SEVERITY_NOTICE => 5,
        MavSeverity::MAV_SEVERITY_INFO => 6,
        MavSeverity::MAV_SEVERITY_DEBUG => 7,
    }
}

struct Inner {
    queue: Deque<LogEntry, LOG_QUEUE_CAPACITY>,
    dropped_count: u64,
    /// Evictions since the last drain; only the first one of a burst warns
    burst_dropped: u64,
    rejected_count: u64,
}

impl Inner {
    /// Append `entry`, returning the evicted entry if it is the first of a burst
    fn enqueue(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.queue.is_full() {
            self.dropped_count += 1;
            self.burst_dropped += 1;
            self.queue.pop_front()
        } else {
            None
        };
        // Cannot fail: there is room after the eviction above
        let _ = self.queue.push_back(entry);
        evicted.filter(|_| self.burst_dropped == 1)
    }

    fn take(&mut self, max_count: usize) -> std::vec::Vec<LogEntry> {
        let count = max_count.min(self.queue.len());
        let mut entries = std::vec::Vec::with_capacity(count);
        while entries.len() < count {
            match self.queue.pop_front() {
                Some(entry) => entries.push(entry),
                None => break,
            }
        }
        entries
    }
}

/// Thread-safe FIFO of pending log entries
pub struct LogAccumulator {
    inner: Mutex<Inner>,
}

impl LogAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: Deque::new(),
                dropped_count: 0,
                burst_dropped: 0,
                rejected_count: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parse a raw payload and queue the resulting entry
    ///
    /// Malformed payloads are counted and reported back; nothing is queued.
    pub fn ingest(&self, raw: &[u8]) -> Result<(), LogPayloadError> {
        match parse_log_payload(raw) {
            Ok(entry) => {
                self.push(entry);
                Ok(())
            }
            Err(e) => {
                self.lock().rejected_count += 1;
                crate::log_debug!("Rejected log payload ({} bytes): {}", raw.len(), e);
                Err(e)
            }
        }
    }

    /// Queue an entry, evicting the oldest one if the queue is full
    ///
    /// The first eviction of a burst logs a warning; the rest are summarised
    /// by the next [`drain`](Self::drain).
    pub fn push(&self, entry: LogEntry) {
        let evicted = self.lock().enqueue(entry);

        if let Some(evicted) = evicted {
            crate::log_warn!(
                "Log queue full, dropping oldest entries (first: \"{}\")",
                evicted.text.as_str()
            );
        }
    }

    /// Queue a locally generated message
    pub fn push_text(&self, severity: MavSeverity, text: &str) {
        self.push(LogEntry::new(severity, text));
    }

    /// Remove and return up to `max_count` oldest entries
    pub fn drain(&self, max_count: usize) -> std::vec::Vec<LogEntry> {
        let (entries, burst, total) = {
            let mut inner = self.lock();
            let entries = inner.take(max_count);
            let burst = core::mem::take(&mut inner.burst_dropped);
            (entries, burst, inner.dropped_count)
        };

        if burst > 0 {
            crate::log_warn!(
                "Log queue overflowed: {} entries dropped ({} total)",
                burst,
                total
            );
        }
        entries
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Return true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Entries evicted because the queue was full
    pub fn dropped_count(&self) -> u64 {
        self.lock().dropped_count
    }

    /// Payloads rejected as malformed
    pub fn rejected_count(&self) -> u64 {
        self.lock().rejected_count
    }
}

impl Default for LogAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
