//! Mock onboard status source

use crate::platform::onboard::{OnboardStatus, OnboardStatusSource};
use std::sync::{Mutex, PoisonError};

/// Serves whatever sample the test last set
#[derive(Debug, Default)]
pub struct FixedOnboardStatus {
    status: Mutex<OnboardStatus>,
}

impl FixedOnboardStatus {
    pub fn new(status: OnboardStatus) -> Self {
        Self {
            status: Mutex::new(status),
        }
    }

    /// Replace the served sample
    pub fn set(&self, status: OnboardStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

impl OnboardStatusSource for FixedOnboardStatus {
    fn sample(&self) -> OnboardStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
