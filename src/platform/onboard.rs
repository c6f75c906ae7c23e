//! Onboard Computer Status
//!
//! Hardware platform detection and companion-computer health sampling.
//!
//! Sampling reads procfs/sysfs, so it runs on a background thread
//! ([`OnboardMonitor`]) and the poll path only copies the latest sample.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Device tree model string location on ARM boards
const DEVICE_TREE_MODEL: &str = "/proc/device-tree/model";
const PROC_LOADAVG: &str = "/proc/loadavg";
const THERMAL_ZONE0: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Wire value for an unknown CPU load
pub const CPU_LOAD_UNKNOWN: u8 = u8::MAX;

/// Wire value for an unknown temperature
pub const TEMPERATURE_UNKNOWN: i8 = i8::MAX;

/// Hardware variant the endpoint runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlatformType {
    Unknown = 0,
    RaspberryPi = 1,
    Jetson = 2,
    X86 = 3,
}

impl PlatformType {
    /// Detect the platform from the device tree, falling back to the build target
    pub fn detect() -> Self {
        match fs::read_to_string(DEVICE_TREE_MODEL) {
            Ok(model) => Self::from_model(&model),
            Err(_) if cfg!(target_arch = "x86_64") => PlatformType::X86,
            Err(_) => PlatformType::Unknown,
        }
    }

    /// Classify a device tree model string
    pub fn from_model(model: &str) -> Self {
        let model = model.trim_end_matches('\0');
        if model.contains("Raspberry Pi") {
            PlatformType::RaspberryPi
        } else if model.contains("Jetson") || model.contains("NVIDIA") {
            PlatformType::Jetson
        } else {
            PlatformType::Unknown
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One health sample; `None` means the value could not be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardStatus {
    pub cpu_load_percent: Option<u8>,
    pub temperature_celsius: Option<i8>,
}

/// Source of the latest onboard health sample
///
/// `sample` is called on the poll path and must not block.
pub trait OnboardStatusSource: Send + Sync {
    fn sample(&self) -> OnboardStatus;
}

/// A source kept by the host can also feed the aggregator
impl<S: OnboardStatusSource + ?Sized> OnboardStatusSource for Arc<S> {
    fn sample(&self) -> OnboardStatus {
        (**self).sample()
    }
}

/// Parse `/proc/loadavg` into a load percentage over `cores` CPUs
pub fn parse_loadavg(contents: &str, cores: usize) -> Option<u8> {
    let one_minute: f32 = contents.split_whitespace().next()?.parse().ok()?;
    if !one_minute.is_finite() || one_minute < 0.0 {
        return None;
    }
    let percent = one_minute / cores.max(1) as f32 * 100.0;
    Some(percent.round().min(100.0) as u8)
}

/// Parse a sysfs thermal zone reading (millidegrees Celsius)
pub fn parse_thermal(contents: &str) -> Option<i8> {
    let millidegrees: i32 = contents.trim().parse().ok()?;
    let celsius = millidegrees / 1000;
    Some(celsius.clamp(i8::MIN as i32, (i8::MAX - 1) as i32) as i8)
}

/// Reads health values from procfs and sysfs
#[derive(Debug, Clone)]
pub struct ProcStatusReader {
    loadavg_path: PathBuf,
    thermal_path: PathBuf,
}

impl ProcStatusReader {
    pub fn new() -> Self {
        Self::with_paths(PROC_LOADAVG, THERMAL_ZONE0)
    }

    /// Read from custom locations (used by tests)
    pub fn with_paths(loadavg: impl Into<PathBuf>, thermal: impl Into<PathBuf>) -> Self {
        Self {
            loadavg_path: loadavg.into(),
            thermal_path: thermal.into(),
        }
    }

    /// Take one sample now (blocking file reads)
    pub fn read(&self) -> OnboardStatus {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        OnboardStatus {
            cpu_load_percent: fs::read_to_string(&self.loadavg_path)
                .ok()
                .and_then(|s| parse_loadavg(&s, cores)),
            temperature_celsius: fs::read_to_string(&self.thermal_path)
                .ok()
                .and_then(|s| parse_thermal(&s)),
        }
    }
}

impl Default for ProcStatusReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Background sampler keeping the latest [`OnboardStatus`]
pub struct OnboardMonitor {
    latest: Arc<Mutex<OnboardStatus>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl OnboardMonitor {
    /// Start sampling with `reader` every `interval`
    pub fn spawn(reader: ProcStatusReader, interval: Duration) -> std::io::Result<Self> {
        let latest = Arc::new(Mutex::new(reader.read()));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let latest = Arc::clone(&latest);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("onboard-monitor".into())
                .spawn(move || {
                    while running.load(Ordering::Relaxed) {
                        thread::sleep(interval);
                        let sample = reader.read();
                        *latest.lock().unwrap_or_else(PoisonError::into_inner) = sample;
                    }
                    crate::log_debug!("Onboard monitor stopped");
                })?
        };

        Ok(Self {
            latest,
            running,
            handle: Some(handle),
        })
    }

    /// Stop the sampling thread and wait for it
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                crate::log_error!("Onboard monitor thread panicked");
            }
        }
    }
}

impl OnboardStatusSource for OnboardMonitor {
    fn sample(&self) -> OnboardStatus {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for OnboardMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
