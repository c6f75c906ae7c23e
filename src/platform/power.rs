//! Power Control Capability
//!
//! Reboot and shutdown requests leave the engine through [`PowerControl`].
//! The call is fire-and-forget: the engine does not wait for, or learn about,
//! the outcome.

use std::process::Command;
use std::thread;
use std::time::Duration;

/// Fire-and-forget reboot/shutdown capability
pub trait PowerControl: Send + Sync {
    /// Request a reboot (`true`) or a shutdown (`false`). Must not block.
    fn power_control(&self, reboot: bool);
}

impl<F> PowerControl for F
where
    F: Fn(bool) + Send + Sync,
{
    fn power_control(&self, reboot: bool) {
        self(reboot)
    }
}

/// Delay before acting so pending frames can leave the radio
pub const DEFAULT_POWER_DELAY: Duration = Duration::from_secs(3);

/// Power control through systemd
///
/// Runs `systemctl reboot` or `systemctl poweroff` on a detached thread after
/// a delay.
#[derive(Debug, Clone)]
pub struct SystemPowerControl {
    delay: Duration,
}

impl SystemPowerControl {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_POWER_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// systemctl verb for the request
    pub fn verb(reboot: bool) -> &'static str {
        if reboot {
            "reboot"
        } else {
            "poweroff"
        }
    }
}

impl Default for SystemPowerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerControl for SystemPowerControl {
    fn power_control(&self, reboot: bool) {
        let delay = self.delay;
        let verb = Self::verb(reboot);
        crate::log_warn!("System {} requested, acting in {:?}", verb, delay);

        let spawned = thread::Builder::new()
            .name("power-control".into())
            .spawn(move || {
                thread::sleep(delay);
                match Command::new("systemctl").arg(verb).status() {
                    Ok(status) if status.success() => {}
                    Ok(status) => crate::log_error!("systemctl {} exited with {}", verb, status),
                    Err(e) => crate::log_error!("systemctl {} failed: {}", verb, e),
                }
            });

        if let Err(e) = spawned {
            crate::log_error!("Cannot start power control thread: {}", e);
        }
    }
}
