//! Mock power control

use crate::platform::power::PowerControl;
use std::sync::{Mutex, PoisonError};

/// Records power requests instead of acting on them
#[derive(Debug, Default)]
pub struct RecordingPowerControl {
    requests: Mutex<Vec<bool>>,
}

impl RecordingPowerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far (`true` = reboot, `false` = shutdown)
    pub fn requests(&self) -> Vec<bool> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PowerControl for RecordingPowerControl {
    fn power_control(&self, reboot: bool) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reboot);
    }
}
