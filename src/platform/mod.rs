//! Platform capabilities
//!
//! Everything the endpoint needs from the host system: onboard health
//! sampling, hardware detection and power control. Test doubles live in
//! [`mock`].

pub mod onboard;
pub mod power;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use onboard::{OnboardMonitor, OnboardStatus, OnboardStatusSource, PlatformType};
pub use power::{PowerControl, SystemPowerControl};
