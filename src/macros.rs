//! Logging macros
//!
//! These forward to the `log` crate when the `logging` feature is enabled and
//! expand to nothing otherwise, so the hot paths pay nothing for them.

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}
