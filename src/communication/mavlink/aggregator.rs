//! Telemetry Aggregator
//!
//! Orchestrates the endpoint's data sources into one outbound batch per poll
//! cycle and routes inbound frames to the command interpreter.
//!
//! # Outbound batch order
//!
//! 1. HEARTBEAT (always, first)
//! 2. ONBOARD_STATUS (always)
//! 3. WIFI_CARD per active card, then one STATS_TOTAL_ALL_STREAMS
//! 4. Up to `logs_per_cycle` STATUSTEXT, oldest first
//!
//! # Threading
//!
//! All entry points take `&self`. The poll thread may call
//! [`generate_outbound`](TelemetryAggregator::generate_outbound) while the
//! transport's receive thread calls [`on_bytes`](TelemetryAggregator::on_bytes)
//! on the same aggregator behind an `Arc`. The aggregator has no timer; the
//! caller drives the cadence.
//!
//! # Failure policy
//!
//! The cycle entry points never return an error. A frame that fails to decode
//! yields no reply, and a message that fails to encode is skipped while the
//! rest of the batch goes out. A failed encode does not consume a sequence
//! number. Only [`encode_message`](TelemetryAggregator::encode_message), used
//! for host-originated frames, reports encode errors to the caller.

use super::codec::{Codec, CodecError, WireMessage};
use super::handlers::command::CommandInterpreter;
use super::handlers::telemetry::{build_link_stats, build_onboard_status, build_statustext};
use super::identity::{HeartbeatProvider, Identity};
use super::link_stats::LinkStatsCache;
use super::message::TelemetryMessage;
use crate::config::TelemetryConfig;
use crate::core::log_buffer::LogAccumulator;
use crate::error::Result;
use crate::platform::onboard::OnboardStatusSource;
use crate::platform::power::PowerControl;
use core::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use mavlink::common::STATUSTEXT_DATA;
use std::sync::Arc;

/// Aggregator statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    /// Completed poll cycles
    pub cycles: u64,
    /// Frames produced by poll cycles
    pub messages_generated: u64,
    /// Messages skipped because the codec refused them
    pub encode_failures: u64,
    /// Inbound frames decoded successfully
    pub inbound_processed: u64,
    /// Inbound frames that failed to decode
    pub inbound_rejected: u64,
    /// Replies produced for inbound frames
    pub replies_sent: u64,
}

#[derive(Default)]
struct Counters {
    cycles: AtomicU64,
    messages_generated: AtomicU64,
    encode_failures: AtomicU64,
    inbound_processed: AtomicU64,
    inbound_rejected: AtomicU64,
    replies_sent: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    fn snapshot(&self) -> AggregatorStats {
        AggregatorStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            messages_generated: self.messages_generated.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            inbound_processed: self.inbound_processed.load(Ordering::Relaxed),
            inbound_rejected: self.inbound_rejected.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
        }
    }
}

/// Telemetry aggregation and dispatch engine
pub struct TelemetryAggregator<C: Codec, P: PowerControl> {
    heartbeat: HeartbeatProvider,
    interpreter: CommandInterpreter<P>,
    codec: C,
    link_stats: Arc<LinkStatsCache>,
    logs: Arc<LogAccumulator>,
    onboard: Option<Box<dyn OnboardStatusSource>>,
    logs_per_cycle: usize,
    sequence: AtomicU8,
    counters: Counters,
}

impl<C: Codec, P: PowerControl> TelemetryAggregator<C, P> {
    /// Create an aggregator
    ///
    /// The statistics cache and log accumulator are shared with their writers
    /// (radio monitor, log receiver); the aggregator only reads and drains them.
    pub fn new(
        config: &TelemetryConfig,
        codec: C,
        power: P,
        link_stats: Arc<LinkStatsCache>,
        logs: Arc<LogAccumulator>,
    ) -> Self {
        let identity = config.identity();
        crate::log_info!(
            "Telemetry endpoint sysid={} compid={} role={:?} platform={:?}",
            identity.system_id,
            identity.component_id,
            identity.role,
            identity.platform
        );

        Self {
            heartbeat: HeartbeatProvider::new(identity),
            interpreter: CommandInterpreter::new(identity, &config.version, power),
            codec,
            link_stats,
            logs,
            onboard: None,
            logs_per_cycle: config.logs_per_cycle,
            sequence: AtomicU8::new(0),
            counters: Counters::default(),
        }
    }

    /// Attach a health source for ONBOARD_STATUS
    ///
    /// Without one, the status message reports unknown CPU load and temperature.
    pub fn with_onboard_status(mut self, source: Box<dyn OnboardStatusSource>) -> Self {
        self.onboard = Some(source);
        self
    }

    pub fn identity(&self) -> &Identity {
        self.heartbeat.identity()
    }

    pub fn link_stats(&self) -> &Arc<LinkStatsCache> {
        &self.link_stats
    }

    pub fn logs(&self) -> &Arc<LogAccumulator> {
        &self.logs
    }

    pub fn power(&self) -> &P {
        self.interpreter.power()
    }

    /// Snapshot of the engine counters
    pub fn stats(&self) -> AggregatorStats {
        self.counters.snapshot()
    }

    /// Compose the outbound batch for one poll cycle
    pub fn generate_outbound(&self) -> Vec<WireMessage> {
        let identity = *self.identity();
        let onboard = self
            .onboard
            .as_ref()
            .map(|source| source.sample())
            .unwrap_or_default();
        let link = self.link_stats.read();
        let entries = self.logs.drain(self.logs_per_cycle);

        let mut messages = Vec::with_capacity(3 + link.cards.len() + entries.len());
        messages.push(TelemetryMessage::Heartbeat(self.heartbeat.heartbeat()));
        messages.push(TelemetryMessage::OnboardStatus(build_onboard_status(
            &identity, &onboard,
        )));
        messages.extend(build_link_stats(&link));
        messages.extend(
            entries
                .iter()
                .map(|entry| TelemetryMessage::StatusText(build_statustext(entry))),
        );

        let frames: Vec<WireMessage> = messages.iter().filter_map(|m| self.encode(m)).collect();

        Counters::bump(&self.counters.cycles, 1);
        Counters::bump(&self.counters.messages_generated, frames.len() as u64);
        crate::log_trace!(
            "Poll cycle: {} frames ({} log entries)",
            frames.len(),
            entries.len()
        );
        frames
    }

    /// Route one inbound frame and return the replies to send
    pub fn process_inbound(&self, message: &WireMessage) -> Vec<WireMessage> {
        self.on_bytes(message.as_bytes())
    }

    /// Transport callback for raw inbound bytes
    ///
    /// Arbitrary bytes are tolerated: undecodable input yields no reply.
    pub fn on_bytes(&self, raw: &[u8]) -> Vec<WireMessage> {
        let (header, message) = match self.codec.decode(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                Counters::bump(&self.counters.inbound_rejected, 1);
                crate::log_debug!("Dropping inbound frame ({} bytes): {}", raw.len(), e);
                return Vec::new();
            }
        };
        Counters::bump(&self.counters.inbound_processed, 1);

        let replies: Vec<WireMessage> = self
            .interpreter
            .process(&header, &message)
            .and_then(|reply| self.encode(&reply))
            .into_iter()
            .collect();

        Counters::bump(&self.counters.replies_sent, replies.len() as u64);
        replies
    }

    /// Encode an extra message under this endpoint's identity
    ///
    /// For messages the host wants to send outside the poll cycle. The frame
    /// takes the next sequence number, shared with poll and reply traffic.
    pub fn encode_message(&self, message: &TelemetryMessage) -> Result<WireMessage> {
        Ok(self.try_encode(message)?)
    }

    /// Encode with the next sequence number, consuming it only on success
    fn try_encode(&self, message: &TelemetryMessage) -> core::result::Result<WireMessage, CodecError> {
        let mut sequence = self.sequence.load(Ordering::Relaxed);
        loop {
            let frame = self
                .codec
                .encode(self.identity().header(sequence), message)?;
            // Wraps at 255 as MAVLink sequence numbers do
            match self.sequence.compare_exchange(
                sequence,
                sequence.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(frame),
                // Another thread took this number; encode again with the current one
                Err(current) => sequence = current,
            }
        }
    }

    fn encode(&self, message: &TelemetryMessage) -> Option<WireMessage> {
        match self.try_encode(message) {
            Ok(frame) => Some(frame),
            Err(e) => {
                Counters::bump(&self.counters.encode_failures, 1);
                match message {
                    TelemetryMessage::StatusText(st) => crate::log_warn!(
                        "Failed to encode STATUSTEXT, log entry lost: \"{}\": {}",
                        statustext_str(st),
                        e
                    ),
                    _ => crate::log_warn!("Failed to encode {}: {}", message.name(), e),
                }
                None
            }
        }
    }
}

/// Text of a STATUSTEXT payload up to its NUL padding
fn statustext_str(st: &STATUSTEXT_DATA) -> std::borrow::Cow<'_, str> {
    let end = st.text.iter().position(|&b| b == 0).unwrap_or(st.text.len());
    String::from_utf8_lossy(&st.text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::mavlink::link_stats::{CardStats, LinkStats, MAX_WIFI_CARDS};
    use crate::communication::mavlink::message::{
        MSG_ID_HEARTBEAT, MSG_ID_ONBOARD_STATUS, MSG_ID_STATS_TOTAL_ALL_STREAMS,
        MSG_ID_STATUSTEXT, MSG_ID_VERSION, MSG_ID_WIFI_CARD,
    };
    use crate::core::log_buffer::LogEntry;
    use crate::error::TelemetryError;
    use crate::platform::mock::{FixedOnboardStatus, LoopbackCodec, RecordingPowerControl};
    use crate::platform::onboard::OnboardStatus;
    use mavlink::common::{MavCmd, MavSeverity, COMMAND_LONG_DATA, PING_DATA};
    use mavlink::MavHeader;
    use proptest::prelude::*;

    type TestAggregator = TelemetryAggregator<Arc<LoopbackCodec>, RecordingPowerControl>;

    const GCS: MavHeader = MavHeader {
        system_id: 255,
        component_id: 190,
        sequence: 0,
    };

    fn aggregator() -> (TestAggregator, Arc<LoopbackCodec>) {
        let codec = Arc::new(LoopbackCodec::new());
        let aggregator = TelemetryAggregator::new(
            &TelemetryConfig::default(),
            Arc::clone(&codec),
            RecordingPowerControl::new(),
            Arc::new(LinkStatsCache::new()),
            Arc::new(LogAccumulator::new()),
        );
        (aggregator, codec)
    }

    fn decode_all(codec: &LoopbackCodec, frames: &[WireMessage]) -> Vec<TelemetryMessage> {
        frames
            .iter()
            .map(|f| codec.decode(f.as_bytes()).unwrap().1)
            .collect()
    }

    fn log_texts(messages: &[TelemetryMessage]) -> Vec<String> {
        messages
            .iter()
            .filter_map(|m| match m {
                TelemetryMessage::StatusText(st) => {
                    let end = st.text.iter().position(|&b| b == 0).unwrap_or(st.text.len());
                    Some(String::from_utf8(st.text[..end].to_vec()).unwrap())
                }
                _ => None,
            })
            .collect()
    }

    fn active_card() -> CardStats {
        CardStats {
            exists: true,
            rx_rssi: -48,
            packets_received: 500,
            packets_injected: 20,
        }
    }

    #[test]
    fn test_empty_cycle_order() {
        let (aggregator, _) = aggregator();

        let ids: Vec<u32> = aggregator
            .generate_outbound()
            .iter()
            .map(|f| f.msg_id())
            .collect();
        assert_eq!(
            ids,
            vec![
                MSG_ID_HEARTBEAT,
                MSG_ID_ONBOARD_STATUS,
                MSG_ID_STATS_TOTAL_ALL_STREAMS
            ]
        );
    }

    #[test]
    fn test_full_cycle_order() {
        let (aggregator, _) = aggregator();
        let mut stats = LinkStats::default();
        stats.cards[0] = active_card();
        aggregator.link_stats().set(stats);
        aggregator
            .logs()
            .push_text(MavSeverity::MAV_SEVERITY_INFO, "hello");

        let ids: Vec<u32> = aggregator
            .generate_outbound()
            .iter()
            .map(|f| f.msg_id())
            .collect();
        assert_eq!(
            ids,
            vec![
                MSG_ID_HEARTBEAT,
                MSG_ID_ONBOARD_STATUS,
                MSG_ID_WIFI_CARD,
                MSG_ID_STATS_TOTAL_ALL_STREAMS,
                MSG_ID_STATUSTEXT
            ]
        );
    }

    #[test]
    fn test_log_cap_scenario() {
        let (aggregator, codec) = aggregator();
        for text in ["A", "B", "C", "D", "E", "F"] {
            aggregator
                .logs()
                .push_text(MavSeverity::MAV_SEVERITY_INFO, text);
        }

        let first = decode_all(&codec, &aggregator.generate_outbound());
        assert_eq!(log_texts(&first), vec!["A", "B", "C", "D", "E"]);

        let second = decode_all(&codec, &aggregator.generate_outbound());
        assert_eq!(log_texts(&second), vec!["F"]);
        assert!(matches!(second[0], TelemetryMessage::Heartbeat(_)));
        assert!(matches!(second[1], TelemetryMessage::OnboardStatus(_)));
        assert!(matches!(second[2], TelemetryMessage::StatsTotalAllStreams(_)));

        let third = decode_all(&codec, &aggregator.generate_outbound());
        assert!(log_texts(&third).is_empty());
    }

    #[test]
    fn test_inactive_card_scenario() {
        let (aggregator, codec) = aggregator();
        let mut stats = LinkStats::default();
        stats.cards[0].exists = false;
        stats.cards[1] = active_card();
        aggregator.link_stats().set(stats);

        let messages = decode_all(&codec, &aggregator.generate_outbound());
        let cards: Vec<u8> = messages
            .iter()
            .filter_map(|m| match m {
                TelemetryMessage::WifiCard(card) => Some(card.card_index),
                _ => None,
            })
            .collect();
        let totals = messages
            .iter()
            .filter(|m| matches!(m, TelemetryMessage::StatsTotalAllStreams(_)))
            .count();

        assert_eq!(cards, vec![1]);
        assert_eq!(totals, 1);
    }

    #[test]
    fn test_onboard_status_from_source() {
        let (aggregator, codec) = aggregator();
        let source = FixedOnboardStatus::new(OnboardStatus {
            cpu_load_percent: Some(12),
            temperature_celsius: Some(44),
        });
        let aggregator = aggregator.with_onboard_status(Box::new(source));

        let messages = decode_all(&codec, &aggregator.generate_outbound());
        match &messages[1] {
            TelemetryMessage::OnboardStatus(status) => {
                assert_eq!(status.cpu_load, 12);
                assert_eq!(status.temperature_core, 44);
                assert_eq!(status.runs_on_air, 1);
            }
            other => panic!("expected ONBOARD_STATUS, got {:?}", other),
        }
    }

    #[test]
    fn test_sequence_and_identity_stamped() {
        let (aggregator, codec) = aggregator();

        let frames = aggregator.generate_outbound();
        let headers: Vec<MavHeader> = frames
            .iter()
            .map(|f| codec.decode(f.as_bytes()).unwrap().0)
            .collect();

        for (i, header) in headers.iter().enumerate() {
            assert_eq!(header.sequence, i as u8);
            assert_eq!(header.system_id, 100);
            assert_eq!(header.component_id, 191);
        }
    }

    #[test]
    fn test_encode_failure_skips_message_only() {
        let (aggregator, codec) = aggregator();
        codec.fail_encoding(MSG_ID_ONBOARD_STATUS);

        let ids: Vec<u32> = aggregator
            .generate_outbound()
            .iter()
            .map(|f| f.msg_id())
            .collect();
        assert_eq!(ids, vec![MSG_ID_HEARTBEAT, MSG_ID_STATS_TOTAL_ALL_STREAMS]);
        assert_eq!(aggregator.stats().encode_failures, 1);
        assert_eq!(aggregator.stats().messages_generated, 2);
    }

    #[test]
    fn test_failed_encode_keeps_sequence_contiguous() {
        let (aggregator, codec) = aggregator();
        codec.fail_encoding(MSG_ID_ONBOARD_STATUS);

        let sequences: Vec<u8> = aggregator
            .generate_outbound()
            .iter()
            .map(|f| codec.decode(f.as_bytes()).unwrap().0.sequence)
            .collect();
        assert_eq!(sequences, vec![0, 1]);

        let next = aggregator.generate_outbound();
        assert_eq!(codec.decode(next[0].as_bytes()).unwrap().0.sequence, 2);
    }

    #[test]
    fn test_failed_statustext_counted_and_rest_sent() {
        let (aggregator, codec) = aggregator();
        codec.fail_encoding(MSG_ID_STATUSTEXT);
        aggregator.logs().push(LogEntry::new(MavSeverity::MAV_SEVERITY_ERROR, "lost"));

        let ids: Vec<u32> = aggregator
            .generate_outbound()
            .iter()
            .map(|f| f.msg_id())
            .collect();
        assert_eq!(
            ids,
            vec![MSG_ID_HEARTBEAT, MSG_ID_ONBOARD_STATUS, MSG_ID_STATS_TOTAL_ALL_STREAMS]
        );
        assert_eq!(aggregator.stats().encode_failures, 1);
        assert!(aggregator.logs().is_empty());
    }

    #[test]
    fn test_statustext_str_stops_at_padding() {
        let entry = LogEntry::new(MavSeverity::MAV_SEVERITY_INFO, "camera ok");
        assert_eq!(statustext_str(&build_statustext(&entry)), "camera ok");
    }

    #[test]
    fn test_encode_message_stamps_identity() {
        let (aggregator, codec) = aggregator();
        aggregator.generate_outbound();

        let ping = TelemetryMessage::Ping(PING_DATA {
            time_usec: 5,
            seq: 1,
            target_system: 0,
            target_component: 0,
        });
        let frame = aggregator.encode_message(&ping).unwrap();
        let (header, decoded) = codec.decode(frame.as_bytes()).unwrap();
        assert_eq!((header.system_id, header.component_id), (100, 191));
        assert_eq!(header.sequence, 3);
        assert_eq!(decoded, ping);
    }

    #[test]
    fn test_encode_message_reports_codec_error() {
        let (aggregator, codec) = aggregator();
        codec.fail_encoding(MSG_ID_HEARTBEAT);

        let heartbeat = TelemetryMessage::Heartbeat(aggregator.heartbeat.heartbeat());
        match aggregator.encode_message(&heartbeat) {
            Err(TelemetryError::Codec(_)) => {}
            other => panic!("expected codec error, got {:?}", other),
        }
        // Explicit encode failures are the caller's to handle
        assert_eq!(aggregator.stats().encode_failures, 0);
    }

    #[test]
    fn test_onboard_source_read_every_cycle() {
        let (aggregator, codec) = aggregator();
        let source = Arc::new(FixedOnboardStatus::new(OnboardStatus {
            cpu_load_percent: Some(10),
            ..OnboardStatus::default()
        }));
        let aggregator = aggregator.with_onboard_status(Box::new(Arc::clone(&source)));

        let cpu_load = |frames: &[WireMessage]| match codec.decode(frames[1].as_bytes()).unwrap().1 {
            TelemetryMessage::OnboardStatus(status) => status.cpu_load,
            other => panic!("expected ONBOARD_STATUS, got {:?}", other),
        };
        assert_eq!(cpu_load(&aggregator.generate_outbound()), 10);

        source.set(OnboardStatus {
            cpu_load_percent: Some(85),
            ..OnboardStatus::default()
        });
        assert_eq!(cpu_load(&aggregator.generate_outbound()), 85);
    }

    #[test]
    fn test_ping_reply() {
        let (aggregator, codec) = aggregator();
        let inbound = codec.inbound(
            GCS,
            TelemetryMessage::Ping(PING_DATA {
                time_usec: 99,
                seq: 3,
                target_system: 0,
                target_component: 0,
            }),
        );

        let replies = aggregator.process_inbound(&inbound);
        assert_eq!(replies.len(), 1);
        match codec.decode(replies[0].as_bytes()).unwrap().1 {
            TelemetryMessage::Ping(pong) => {
                assert_eq!((pong.time_usec, pong.seq), (99, 3));
                assert_eq!(pong.target_system, GCS.system_id);
            }
            other => panic!("expected PING, got {:?}", other),
        }
        assert_eq!(aggregator.stats().replies_sent, 1);
    }

    #[test]
    fn test_power_command_no_reply() {
        let (aggregator, codec) = aggregator();
        let inbound = codec.inbound(
            GCS,
            TelemetryMessage::CommandLong(COMMAND_LONG_DATA {
                target_system: 100,
                target_component: 191,
                command: MavCmd::MAV_CMD_PREFLIGHT_REBOOT_SHUTDOWN,
                confirmation: 0,
                param1: 0.0,
                param2: 2.0,
                param3: 0.0,
                param4: 0.0,
                param5: 0.0,
                param6: 0.0,
                param7: 0.0,
            }),
        );

        assert!(aggregator.process_inbound(&inbound).is_empty());
        assert_eq!(aggregator.power().requests(), vec![false]);
    }

    #[test]
    fn test_request_version_reply() {
        let (aggregator, codec) = aggregator();
        let inbound = codec.inbound(
            GCS,
            TelemetryMessage::CommandLong(COMMAND_LONG_DATA {
                target_system: 0,
                target_component: 0,
                command: MavCmd::MAV_CMD_REQUEST_MESSAGE,
                confirmation: 0,
                param1: MSG_ID_VERSION as f32,
                param2: 0.0,
                param3: 0.0,
                param4: 0.0,
                param5: 0.0,
                param6: 0.0,
                param7: 0.0,
            }),
        );

        let replies = aggregator.process_inbound(&inbound);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].msg_id(), MSG_ID_VERSION);
    }

    #[test]
    fn test_garbage_bytes_tolerated() {
        let (aggregator, _) = aggregator();

        assert!(aggregator.on_bytes(&[]).is_empty());
        assert!(aggregator.on_bytes(&[0xFE, 0x00, 0x13]).is_empty());
        assert!(aggregator.on_bytes(&u32::MAX.to_le_bytes()).is_empty());
        assert_eq!(aggregator.stats().inbound_rejected, 3);
        assert_eq!(aggregator.stats().inbound_processed, 0);
    }

    #[test]
    fn test_own_telemetry_echo_ignored() {
        let (aggregator, _) = aggregator();
        let frames = aggregator.generate_outbound();

        for frame in &frames {
            assert!(aggregator.process_inbound(frame).is_empty());
        }
        assert_eq!(aggregator.stats().inbound_processed, frames.len() as u64);
    }

    #[test]
    fn test_concurrent_poll_and_ingest() {
        let (aggregator, codec) = aggregator();
        let aggregator = Arc::new(aggregator);
        let logs = Arc::clone(aggregator.logs());

        let producer = std::thread::spawn(move || {
            for i in 0..40 {
                logs.push_text(MavSeverity::MAV_SEVERITY_INFO, &format!("{i}"));
            }
        });

        let mut emitted = Vec::new();
        for _ in 0..20 {
            emitted.extend(log_texts(&decode_all(&codec, &aggregator.generate_outbound())));
        }
        producer.join().unwrap();
        while !aggregator.logs().is_empty() {
            emitted.extend(log_texts(&decode_all(&codec, &aggregator.generate_outbound())));
        }

        // 40 entries never exceed the ceiling: each is emitted once, in order
        let expected: Vec<String> = (0..40).map(|i| i.to_string()).collect();
        assert_eq!(emitted, expected);
    }

    proptest! {
        #[test]
        fn prop_one_message_per_active_card(
            exists in proptest::array::uniform4(any::<bool>()),
            rssi in any::<i8>(),
        ) {
            let (aggregator, codec) = aggregator();
            let mut stats = LinkStats::default();
            for (card, &active) in stats.cards.iter_mut().zip(exists.iter()) {
                card.exists = active;
                card.rx_rssi = rssi;
            }
            aggregator.link_stats().set(stats);

            let messages = decode_all(&codec, &aggregator.generate_outbound());
            let cards: Vec<u8> = messages
                .iter()
                .filter_map(|m| match m {
                    TelemetryMessage::WifiCard(card) => Some(card.card_index),
                    _ => None,
                })
                .collect();
            let expected: Vec<u8> = (0..MAX_WIFI_CARDS as u8)
                .filter(|&i| exists[i as usize])
                .collect();
            let totals = messages
                .iter()
                .filter(|m| matches!(m, TelemetryMessage::StatsTotalAllStreams(_)))
                .count();

            prop_assert_eq!(cards, expected);
            prop_assert_eq!(totals, 1);
        }
    }
}
