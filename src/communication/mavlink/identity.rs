//! Endpoint Identity and Heartbeat
//!
//! The identity (system id, component id, platform, role) is fixed when the
//! endpoint is constructed. The heartbeat built from it is the first message of
//! every poll cycle; the ground side uses it to detect that this endpoint is
//! alive.

use crate::platform::onboard::PlatformType;
use core::str::FromStr;
use mavlink::common::{MavAutopilot, MavModeFlag, MavState, MavType, HEARTBEAT_DATA};
use mavlink::MavHeader;

/// MAVLink component id of a companion (onboard) computer
pub const COMPONENT_ID_ONBOARD_COMPUTER: u8 = 191;

/// Which end of the link this endpoint runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    /// Vehicle side
    Air,
    /// Ground station side
    Ground,
}

impl EndpointRole {
    pub fn runs_on_air(self) -> bool {
        matches!(self, EndpointRole::Air)
    }

    /// Conventional system id for this role
    pub fn default_system_id(self) -> u8 {
        match self {
            EndpointRole::Air => 100,
            EndpointRole::Ground => 101,
        }
    }

    /// Role flag carried in the heartbeat `custom_mode` field
    pub fn heartbeat_flag(self) -> u32 {
        match self {
            EndpointRole::Air => 0,
            EndpointRole::Ground => 1,
        }
    }
}

impl FromStr for EndpointRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "air" | "vehicle" => Ok(EndpointRole::Air),
            "ground" | "gnd" => Ok(EndpointRole::Ground),
            _ => Err(()),
        }
    }
}

/// Addressing identity of this endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub system_id: u8,
    pub component_id: u8,
    pub platform: PlatformType,
    pub role: EndpointRole,
}

impl Identity {
    pub fn new(system_id: u8, component_id: u8, platform: PlatformType, role: EndpointRole) -> Self {
        Self {
            system_id,
            component_id,
            platform,
            role,
        }
    }

    /// MAVLink header for an outgoing message with the given sequence number
    pub fn header(&self, sequence: u8) -> MavHeader {
        MavHeader {
            system_id: self.system_id,
            component_id: self.component_id,
            sequence,
        }
    }

    /// Return true if a command targeting `target_system` concerns us
    ///
    /// 0 is the broadcast system id.
    pub fn accepts_target(&self, target_system: u8) -> bool {
        target_system == 0 || target_system == self.system_id
    }
}

/// Builds the periodic liveness message
pub struct HeartbeatProvider {
    identity: Identity,
}

impl HeartbeatProvider {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Build the HEARTBEAT payload
    pub fn heartbeat(&self) -> HEARTBEAT_DATA {
        HEARTBEAT_DATA {
            custom_mode: self.identity.role.heartbeat_flag(),
            mavtype: MavType::MAV_TYPE_ONBOARD_CONTROLLER,
            autopilot: MavAutopilot::MAV_AUTOPILOT_INVALID,
            base_mode: MavModeFlag::empty(),
            system_status: MavState::MAV_STATE_ACTIVE,
            mavlink_version: 3,
        }
    }
}
