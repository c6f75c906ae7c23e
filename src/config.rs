//! Endpoint configuration
//!
//! Build-time defaults come from `build.rs` (`LINK_TELEMETRY_VERSION`,
//! `LINK_TELEMETRY_LOG_PORT`). Runtime overrides are read from the process
//! environment by [`TelemetryConfig::from_env`]:
//!
//! | Variable                   | Meaning                          | Default          |
//! |----------------------------|----------------------------------|------------------|
//! | `TELEMETRY_ROLE`           | `air` or `ground`                | `air`            |
//! | `TELEMETRY_SYSTEM_ID`      | MAVLink system id (1..=255)      | 100 air, 101 gnd |
//! | `TELEMETRY_COMPONENT_ID`   | MAVLink component id             | 191              |
//! | `TELEMETRY_LOG_PORT`       | Local log UDP port               | build default    |
//! | `TELEMETRY_LOGS_PER_CYCLE` | Log messages per poll cycle      | 5                |

use crate::communication::mavlink::identity::{
    EndpointRole, Identity, COMPONENT_ID_ONBOARD_COMPUTER,
};
use crate::error::{Result, TelemetryError};
use crate::platform::onboard::PlatformType;
use core::str::FromStr;

/// Version reported in the VERSION message
pub const BUILD_VERSION: &str = env!("LINK_TELEMETRY_VERSION");

const BUILD_LOG_PORT: &str = env!("LINK_TELEMETRY_LOG_PORT");

/// Fallback local log port
pub const DEFAULT_LOG_PORT: u16 = 9999;

/// Log messages emitted per poll cycle
pub const DEFAULT_LOGS_PER_CYCLE: usize = 5;

/// Telemetry endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub role: EndpointRole,
    pub system_id: u8,
    pub component_id: u8,
    pub platform: PlatformType,
    /// Maximum log messages per poll cycle
    pub logs_per_cycle: usize,
    /// Localhost UDP port the log receiver binds
    pub log_port: u16,
    pub version: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::for_role(EndpointRole::Air)
    }
}

impl TelemetryConfig {
    /// Defaults for one side of the link
    pub fn for_role(role: EndpointRole) -> Self {
        Self {
            role,
            system_id: role.default_system_id(),
            component_id: COMPONENT_ID_ONBOARD_COMPUTER,
            platform: PlatformType::Unknown,
            logs_per_cycle: DEFAULT_LOGS_PER_CYCLE,
            log_port: BUILD_LOG_PORT.parse().unwrap_or(DEFAULT_LOG_PORT),
            version: BUILD_VERSION.into(),
        }
    }

    /// Read overrides from the process environment and detect the platform
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.platform = PlatformType::detect();
        Ok(config)
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let role = match lookup("TELEMETRY_ROLE") {
            Some(value) => EndpointRole::from_str(&value).map_err(|_| {
                TelemetryError::Config(format!("TELEMETRY_ROLE must be air or ground, got {value:?}"))
            })?,
            None => EndpointRole::Air,
        };

        let mut config = Self::for_role(role);
        if let Some(id) = parse_var::<u8, _>(&lookup, "TELEMETRY_SYSTEM_ID")? {
            config.system_id = id;
        }
        if let Some(id) = parse_var::<u8, _>(&lookup, "TELEMETRY_COMPONENT_ID")? {
            config.component_id = id;
        }
        if let Some(port) = parse_var::<u16, _>(&lookup, "TELEMETRY_LOG_PORT")? {
            config.log_port = port;
        }
        if let Some(cap) = parse_var::<usize, _>(&lookup, "TELEMETRY_LOGS_PER_CYCLE")? {
            config.logs_per_cycle = cap;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.system_id == 0 {
            return Err(TelemetryError::Config(
                "system id 0 is the broadcast address".into(),
            ));
        }
        if self.logs_per_cycle == 0 {
            return Err(TelemetryError::Config(
                "logs per cycle must be at least 1".into(),
            ));
        }
        if self.log_port == 0 {
            return Err(TelemetryError::Config("log port must be non-zero".into()));
        }
        Ok(())
    }

    /// Addressing identity derived from this configuration
    pub fn identity(&self) -> Identity {
        Identity::new(self.system_id, self.component_id, self.platform, self.role)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| TelemetryError::Config(format!("{key} has invalid value {value:?}"))),
        None => Ok(None),
    }
}
