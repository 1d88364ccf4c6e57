#![deny(missing_docs)]
//! Shared logging utilities for the ships-from filter workspace.
//!
//! This crate provides the `filter_*` logging macros used across the codebase.
//! Every line is tagged with the activation it belongs to, so interleaved
//! lifecycle runs on the single UI thread can be told apart in the console.
//! It also carries a test initializer for the global logger and, in the
//! browser build, a logger that forwards records to the developer console.

use std::cell::Cell;

#[cfg(target_arch = "wasm32")]
pub mod console;

thread_local! {
    /// Activation number of the lifecycle run currently executing on this thread.
    static ACTIVATION: Cell<u64> = const { Cell::new(0) };
}

/// Records the activation number used to tag log lines on this thread.
/// The lifecycle controller calls this when a new activation begins.
pub fn set_activation(activation: u64) {
    ACTIVATION.with(|v| v.set(activation));
}

/// Retrieves the activation number for the current thread.
/// Returns 0 before the first activation.
pub fn current_activation() -> u64 {
    ACTIVATION.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current activation.
#[macro_export]
macro_rules! filter_trace {
    ($($arg:tt)*) => {{
        log::trace!("[activation {}] {}", $crate::current_activation(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current activation.
#[macro_export]
macro_rules! filter_debug {
    ($($arg:tt)*) => {{
        log::debug!("[activation {}] {}", $crate::current_activation(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current activation.
#[macro_export]
macro_rules! filter_info {
    ($($arg:tt)*) => {{
        log::info!("[activation {}] {}", $crate::current_activation(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current activation.
#[macro_export]
macro_rules! filter_warn {
    ($($arg:tt)*) => {{
        log::warn!("[activation {}] {}", $crate::current_activation(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current activation.
#[macro_export]
macro_rules! filter_error {
    ($($arg:tt)*) => {{
        log::error!("[activation {}] {}", $crate::current_activation(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
#[cfg(not(target_arch = "wasm32"))]
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
