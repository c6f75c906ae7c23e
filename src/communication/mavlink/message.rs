//! Telemetry Message Vocabulary
//!
//! The closed set of messages this endpoint sends or understands. Standard
//! MAVLink messages reuse the `mavlink::common` payload structs; link statistics,
//! onboard status and version use the endpoint's extension dialect, whose
//! payloads are defined here.
//!
//! # Message IDs
//!
//! | Message                 | ID   | Dialect   |
//! |-------------------------|------|-----------|
//! | HEARTBEAT               | 0    | common    |
//! | PING                    | 4    | common    |
//! | COMMAND_LONG            | 76   | common    |
//! | STATUSTEXT              | 253  | common    |
//! | PROTOCOL_VERSION        | 300  | common    |
//! | WIFI_CARD               | 1211 | extension |
//! | STATS_TOTAL_ALL_STREAMS | 1212 | extension |
//! | ONBOARD_STATUS          | 1213 | extension |
//! | VERSION                 | 1220 | extension |

use heapless::String;
use mavlink::common::{
    COMMAND_LONG_DATA, HEARTBEAT_DATA, PING_DATA, PROTOCOL_VERSION_DATA, STATUSTEXT_DATA,
};

pub const MSG_ID_HEARTBEAT: u32 = 0;
pub const MSG_ID_PING: u32 = 4;
pub const MSG_ID_COMMAND_LONG: u32 = 76;
pub const MSG_ID_STATUSTEXT: u32 = 253;
pub const MSG_ID_PROTOCOL_VERSION: u32 = 300;
pub const MSG_ID_WIFI_CARD: u32 = 1211;
pub const MSG_ID_STATS_TOTAL_ALL_STREAMS: u32 = 1212;
pub const MSG_ID_ONBOARD_STATUS: u32 = 1213;
pub const MSG_ID_VERSION: u32 = 1220;

/// Maximum version string length in bytes
pub const VERSION_STRING_LEN: usize = 30;

/// Per-card link statistics (WIFI_CARD)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WifiCardData {
    pub card_index: u8,
    pub rx_rssi: i8,
    pub count_p_received: u64,
    pub count_p_injected: u64,
}

/// Aggregate link statistics (STATS_TOTAL_ALL_STREAMS)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsTotalData {
    pub count_wifi_packets_received: u64,
    pub count_bytes_received: u64,
    pub count_wifi_packets_injected: u64,
    pub count_bytes_injected: u64,
}

/// Companion computer health (ONBOARD_STATUS)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardStatusData {
    /// CPU load in percent, 255 = unknown
    pub cpu_load: u8,
    /// SoC temperature in degrees Celsius, 127 = unknown
    pub temperature_core: i8,
    /// Hardware platform discriminant
    pub platform_type: u8,
    /// 1 if this endpoint runs on the vehicle, 0 on the ground
    pub runs_on_air: u8,
}

/// Software version (VERSION)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionData {
    pub version: String<VERSION_STRING_LEN>,
}

/// Every message this endpoint produces or consumes
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryMessage {
    Heartbeat(HEARTBEAT_DATA),
    Ping(PING_DATA),
    CommandLong(COMMAND_LONG_DATA),
    StatusText(STATUSTEXT_DATA),
    ProtocolVersion(PROTOCOL_VERSION_DATA),
    WifiCard(WifiCardData),
    StatsTotalAllStreams(StatsTotalData),
    OnboardStatus(OnboardStatusData),
    Version(VersionData),
}

impl TelemetryMessage {
    /// Numeric message id used on the wire
    pub fn message_id(&self) -> u32 {
        match self {
            TelemetryMessage::Heartbeat(_) => MSG_ID_HEARTBEAT,
            TelemetryMessage::Ping(_) => MSG_ID_PING,
            TelemetryMessage::CommandLong(_) => MSG_ID_COMMAND_LONG,
            TelemetryMessage::StatusText(_) => MSG_ID_STATUSTEXT,
            TelemetryMessage::ProtocolVersion(_) => MSG_ID_PROTOCOL_VERSION,
            TelemetryMessage::WifiCard(_) => MSG_ID_WIFI_CARD,
            TelemetryMessage::StatsTotalAllStreams(_) => MSG_ID_STATS_TOTAL_ALL_STREAMS,
            TelemetryMessage::OnboardStatus(_) => MSG_ID_ONBOARD_STATUS,
            TelemetryMessage::Version(_) => MSG_ID_VERSION,
        }
    }

    /// Message name for logging
    pub fn name(&self) -> &'static str {
        match self {
            TelemetryMessage::Heartbeat(_) => "HEARTBEAT",
            TelemetryMessage::Ping(_) => "PING",
            TelemetryMessage::CommandLong(_) => "COMMAND_LONG",
            TelemetryMessage::StatusText(_) => "STATUSTEXT",
            TelemetryMessage::ProtocolVersion(_) => "PROTOCOL_VERSION",
            TelemetryMessage::WifiCard(_) => "WIFI_CARD",
            TelemetryMessage::StatsTotalAllStreams(_) => "STATS_TOTAL_ALL_STREAMS",
            TelemetryMessage::OnboardStatus(_) => "ONBOARD_STATUS",
            TelemetryMessage::Version(_) => "VERSION",
        }
    }
}
