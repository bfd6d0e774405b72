#![deny(missing_docs)]
//! Shared logging utilities for the bootstatus workspace.
//!
//! This crate provides the `status_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every message is
//! prefixed with the page generation of the logging thread.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current page generation.
    static PAGE_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the page generation for the current thread.
/// The host loop and the engine thread bump this once per (re)load.
pub fn set_page_generation(generation: u64) {
    PAGE_GENERATION.with(|v| v.set(generation));
}

/// Retrieves the page generation for the current thread.
/// Returns 0 before the first page load.
pub fn page_generation() -> u64 {
    PAGE_GENERATION.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! status_trace {
    ($($arg:tt)*) => {{
        log::trace!("[page {}] {}", $crate::page_generation(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! status_debug {
    ($($arg:tt)*) => {{
        log::debug!("[page {}] {}", $crate::page_generation(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! status_info {
    ($($arg:tt)*) => {{
        log::info!("[page {}] {}", $crate::page_generation(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! status_warn {
    ($($arg:tt)*) => {{
        log::warn!("[page {}] {}", $crate::page_generation(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! status_error {
    ($($arg:tt)*) => {{
        log::error!("[page {}] {}", $crate::page_generation(), format_args!($($arg)*));
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
