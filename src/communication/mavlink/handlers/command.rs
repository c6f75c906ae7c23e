//! Command Interpreter
//!
//! Handles the small fixed set of inbound commands this endpoint understands.
//! Each command is interpreted on its own; the interpreter holds no state
//! between calls.
//!
//! # Supported Commands
//!
//! - **PING** (request form): reply echoing `time_usec` and `seq`, addressed
//!   back to the sender
//! - **MAV_CMD_PREFLIGHT_REBOOT_SHUTDOWN**: reboot or shut down the companion
//!   computer through the injected [`PowerControl`] capability, no reply
//! - **MAV_CMD_REQUEST_MESSAGE**: VERSION or PROTOCOL_VERSION on demand
//!
//! Everything else is ignored. Unlike a flight controller this endpoint sends
//! no COMMAND_ACK: power commands are fire-and-forget and the requested message
//! is itself the answer.

use super::telemetry::build_version;
use crate::communication::mavlink::identity::Identity;
use crate::communication::mavlink::message::{
    TelemetryMessage, VersionData, MSG_ID_PROTOCOL_VERSION, MSG_ID_VERSION,
};
use crate::platform::power::PowerControl;
use mavlink::common::{MavCmd, COMMAND_LONG_DATA, PING_DATA, PROTOCOL_VERSION_DATA};
use mavlink::MavHeader;

/// MAVLink protocol version (MAVLink 2.0)
pub const MAVLINK_VERSION: u16 = 200;

/// Minimum supported MAVLink protocol version
pub const MAVLINK_MIN_VERSION: u16 = 200;

/// Maximum supported MAVLink protocol version
pub const MAVLINK_MAX_VERSION: u16 = 200;

/// PREFLIGHT_REBOOT_SHUTDOWN action: reboot
const ACTION_REBOOT: u32 = 1;

/// PREFLIGHT_REBOOT_SHUTDOWN action: shutdown
const ACTION_SHUTDOWN: u32 = 2;

/// A recognised inbound command
#[derive(Debug, Clone, PartialEq)]
pub enum InboundCommand {
    /// Ping request from `requester`
    Ping {
        requester: MavHeader,
        request: PING_DATA,
    },
    Reboot,
    Shutdown,
    /// On-demand message request
    RequestMessage { message_type_id: u32 },
}

impl InboundCommand {
    /// Classify an inbound message
    ///
    /// Returns `None` for anything this endpoint does not act on: other
    /// message types, commands for another system, pings that are replies
    /// rather than requests, unknown command ids and out-of-range parameters.
    pub fn parse(
        identity: &Identity,
        header: &MavHeader,
        message: &TelemetryMessage,
    ) -> Option<Self> {
        match message {
            TelemetryMessage::Ping(ping) => {
                // A request carries a zero target; a reply names its requester
                if ping.target_system != 0 || ping.target_component != 0 {
                    crate::log_trace!("Ignoring PING reply from {}", header.system_id);
                    return None;
                }
                Some(InboundCommand::Ping {
                    requester: *header,
                    request: ping.clone(),
                })
            }
            TelemetryMessage::CommandLong(cmd) => Self::parse_command_long(identity, cmd),
            other => {
                crate::log_trace!("Ignoring inbound {}", other.name());
                None
            }
        }
    }

    fn parse_command_long(identity: &Identity, cmd: &COMMAND_LONG_DATA) -> Option<Self> {
        if !identity.accepts_target(cmd.target_system) {
            crate::log_trace!(
                "Ignoring COMMAND_LONG for system {} (we are {})",
                cmd.target_system,
                identity.system_id
            );
            return None;
        }

        match cmd.command {
            MavCmd::MAV_CMD_PREFLIGHT_REBOOT_SHUTDOWN => {
                // param1 addresses the autopilot, param2 the companion computer
                let action = if cmd.param2 != 0.0 {
                    cmd.param2
                } else {
                    cmd.param1
                };
                match whole_param(action) {
                    Some(ACTION_REBOOT) => Some(InboundCommand::Reboot),
                    Some(ACTION_SHUTDOWN) => Some(InboundCommand::Shutdown),
                    _ => {
                        crate::log_debug!("Ignoring reboot/shutdown action {}", action);
                        None
                    }
                }
            }
            MavCmd::MAV_CMD_REQUEST_MESSAGE => {
                let Some(message_type_id) = whole_param(cmd.param1) else {
                    crate::log_debug!("Invalid REQUEST_MESSAGE id {}", cmd.param1);
                    return None;
                };
                Some(InboundCommand::RequestMessage { message_type_id })
            }
            _ => {
                crate::log_debug!("Unsupported command: {}", cmd.command as u32);
                None
            }
        }
    }
}

/// A float command parameter that carries an exact unsigned integer
///
/// Fractional, negative, non-finite and out-of-range values are rejected
/// rather than truncated.
fn whole_param(value: f32) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u32::MAX as f32 {
        Some(value as u32)
    } else {
        None
    }
}

/// Interprets inbound commands and produces replies
///
/// The power capability is injected at construction so tests can substitute
/// a recording implementation.
pub struct CommandInterpreter<P: PowerControl> {
    identity: Identity,
    version: VersionData,
    power: P,
}

impl<P: PowerControl> CommandInterpreter<P> {
    /// Create an interpreter answering for `identity` and reporting `version`
    pub fn new(identity: Identity, version: &str, power: P) -> Self {
        Self {
            identity,
            version: build_version(version),
            power,
        }
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    /// Handle one decoded inbound message
    ///
    /// Returns the reply to send, if any. Never blocks; power requests are
    /// handed to the capability and not awaited.
    pub fn process(&self, header: &MavHeader, message: &TelemetryMessage) -> Option<TelemetryMessage> {
        let command = InboundCommand::parse(&self.identity, header, message)?;
        self.execute(command)
    }

    /// Carry out an already classified command
    pub fn execute(&self, command: InboundCommand) -> Option<TelemetryMessage> {
        match command {
            InboundCommand::Ping { requester, request } => {
                Some(TelemetryMessage::Ping(Self::ping_reply(&requester, &request)))
            }
            InboundCommand::Reboot => {
                crate::log_warn!("Reboot requested");
                self.power.power_control(true);
                None
            }
            InboundCommand::Shutdown => {
                crate::log_warn!("Shutdown requested");
                self.power.power_control(false);
                None
            }
            InboundCommand::RequestMessage { message_type_id } => {
                self.handle_request_message(message_type_id)
            }
        }
    }

    /// Build the reply for a ping request
    pub fn ping_reply(requester: &MavHeader, request: &PING_DATA) -> PING_DATA {
        PING_DATA {
            time_usec: request.time_usec,
            seq: request.seq,
            target_system: requester.system_id,
            target_component: requester.component_id,
        }
    }

    fn handle_request_message(&self, message_id: u32) -> Option<TelemetryMessage> {
        match message_id {
            MSG_ID_VERSION => {
                crate::log_debug!("Version requested via MAV_CMD_REQUEST_MESSAGE");
                Some(TelemetryMessage::Version(self.version.clone()))
            }
            MSG_ID_PROTOCOL_VERSION => {
                crate::log_debug!("Protocol version requested via MAV_CMD_REQUEST_MESSAGE");
                Some(TelemetryMessage::ProtocolVersion(
                    Self::create_protocol_version_message(),
                ))
            }
            _ => {
                crate::log_debug!("Unsupported message ID in REQUEST_MESSAGE: {}", message_id);
                None
            }
        }
    }

    /// Create PROTOCOL_VERSION message
    pub fn create_protocol_version_message() -> PROTOCOL_VERSION_DATA {
        PROTOCOL_VERSION_DATA {
            version: MAVLINK_VERSION,
            min_version: MAVLINK_MIN_VERSION,
            max_version: MAVLINK_MAX_VERSION,
            spec_version_hash: [0u8; 8],
            library_version_hash: [0u8; 8],
        }
    }
}
