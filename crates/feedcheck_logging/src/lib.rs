#![deny(missing_docs)]
//! Shared logging utilities for the feedcheck workspace.
//!
//! This crate provides the `check_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every record is
//! prefixed with the label of the flow currently running on this thread.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

/// Label used when no flow is active.
pub const NO_FLOW: &str = "-";

thread_local! {
    /// Thread-local storage for the label of the running top-level flow.
    static FLOW: Cell<&'static str> = const { Cell::new(NO_FLOW) };
}

/// Sets the flow label for the current thread.
pub fn set_flow(label: &'static str) {
    FLOW.with(|v| v.set(label));
}

/// Retrieves the flow label for the current thread.
/// Returns [`NO_FLOW`] if no flow has been entered.
pub fn current_flow() -> &'static str {
    FLOW.with(|v| v.get())
}

/// Scoped flow label; restores the previous label when dropped.
#[must_use = "the flow label is reset as soon as the guard is dropped"]
pub struct FlowGuard {
    previous: &'static str,
}

impl FlowGuard {
    /// Enters `label` until the returned guard goes out of scope.
    pub fn enter(label: &'static str) -> Self {
        let previous = current_flow();
        set_flow(label);
        Self { previous }
    }
}

impl Drop for FlowGuard {
    fn drop(&mut self) {
        set_flow(self.previous);
    }
}

/// Logs a trace-level message tagged with the current flow.
#[macro_export]
macro_rules! check_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[{}] {}", $crate::current_flow(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current flow.
#[macro_export]
macro_rules! check_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[{}] {}", $crate::current_flow(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current flow.
#[macro_export]
macro_rules! check_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[{}] {}", $crate::current_flow(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current flow.
#[macro_export]
macro_rules! check_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[{}] {}", $crate::current_flow(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current flow.
#[macro_export]
macro_rules! check_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[{}] {}", $crate::current_flow(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
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
