//! Telemetry Message Builders
//!
//! Turns the endpoint's internal data sources into outbound message payloads.
//!
//! # Supported Messages
//!
//! - **ONBOARD_STATUS**: Companion computer health and platform
//! - **WIFI_CARD**: One per active radio card
//! - **STATS_TOTAL_ALL_STREAMS**: Aggregate link counters
//! - **STATUSTEXT**: One per accumulated log entry
//! - **VERSION**: Software version string (on demand)

use crate::communication::mavlink::identity::Identity;
use crate::communication::mavlink::link_stats::{CardStats, LinkStats, TotalStats};
use crate::communication::mavlink::message::{
    OnboardStatusData, StatsTotalData, TelemetryMessage, VersionData, WifiCardData,
    VERSION_STRING_LEN,
};
use crate::core::log_buffer::{LogEntry, LOG_TEXT_LEN};
use crate::platform::onboard::{OnboardStatus, CPU_LOAD_UNKNOWN, TEMPERATURE_UNKNOWN};
use mavlink::common::STATUSTEXT_DATA;

/// Build ONBOARD_STATUS from a health sample
///
/// Values that could not be read are sent as the unknown sentinels.
pub fn build_onboard_status(identity: &Identity, status: &OnboardStatus) -> OnboardStatusData {
    OnboardStatusData {
        cpu_load: status.cpu_load_percent.unwrap_or(CPU_LOAD_UNKNOWN),
        temperature_core: status.temperature_celsius.unwrap_or(TEMPERATURE_UNKNOWN),
        platform_type: identity.platform.as_u8(),
        runs_on_air: u8::from(identity.role.runs_on_air()),
    }
}

/// Build WIFI_CARD for one card
pub fn build_wifi_card(card_index: u8, card: &CardStats) -> WifiCardData {
    WifiCardData {
        card_index,
        rx_rssi: card.rx_rssi,
        count_p_received: card.packets_received,
        count_p_injected: card.packets_injected,
    }
}

/// Build STATS_TOTAL_ALL_STREAMS
pub fn build_stats_total(totals: &TotalStats) -> StatsTotalData {
    StatsTotalData {
        count_wifi_packets_received: totals.packets_received,
        count_bytes_received: totals.bytes_received,
        count_wifi_packets_injected: totals.packets_injected,
        count_bytes_injected: totals.bytes_injected,
    }
}

/// Expand a statistics snapshot into messages
///
/// One WIFI_CARD per active card in index order, then exactly one
/// STATS_TOTAL_ALL_STREAMS. Inactive cards never reach the output.
pub fn build_link_stats(stats: &LinkStats) -> Vec<TelemetryMessage> {
    stats
        .active_cards()
        .map(|(index, card)| TelemetryMessage::WifiCard(build_wifi_card(index, card)))
        .chain(core::iter::once(TelemetryMessage::StatsTotalAllStreams(
            build_stats_total(&stats.totals),
        )))
        .collect()
}

/// Build STATUSTEXT for one log entry
///
/// Entry text already fits one STATUSTEXT payload, so there is no chunking.
pub fn build_statustext(entry: &LogEntry) -> STATUSTEXT_DATA {
    let bytes = entry.text.as_bytes();
    let mut text_bytes = [0u8; LOG_TEXT_LEN];
    text_bytes[..bytes.len()].copy_from_slice(bytes);

    STATUSTEXT_DATA {
        severity: entry.severity,
        text: text_bytes.into(),
        id: 0,
        chunk_seq: 0,
    }
}

/// Build VERSION, truncating on a char boundary if needed
pub fn build_version(version: &str) -> VersionData {
    let mut end = version.len().min(VERSION_STRING_LEN);
    while !version.is_char_boundary(end) {
        end -= 1;
    }

    let mut data = VersionData::default();
    // Cannot fail: `end` is within capacity
    let _ = data.version.push_str(&version[..end]);
    data
}
