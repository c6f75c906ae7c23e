//! Logging abstraction
//!
//! Provides unified logging macros for the telemetry endpoint. All macros
//! forward to the [`log`] facade, so the hosting binary decides where records
//! go (journald, stderr, a file) by installing a logger at startup.
//!
//! Tests install `env_logger` in test mode:
//!
//! ```ignore
//! let _ = env_logger::builder().is_test(true).try_init();
//! ```
//!
//! The macros use the `link_telemetry` target prefix of the calling module,
//! which lets operators filter with e.g. `RUST_LOG=link_telemetry=debug`.

#[doc(hidden)]
pub use log as __log;

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::info!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::warn!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::error!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::debug!($($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::trace!($($arg)*);
    }};
}
