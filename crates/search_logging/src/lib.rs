#![deny(missing_docs)]
//! Logging macros shared by the document search crates.
//!
//! The core state machine, the HTTP engine and the command-line front end
//! all log through `search_error!` .. `search_trace!`, so the macros can be
//! retargeted in one place. Callers only depend on this crate; `log` is
//! reached through the re-export below.

#[doc(hidden)]
pub use log;

/// Environment variable read by [`initialize_for_tests`] to pick the level.
pub const TEST_LOG_ENV: &str = "SEARCH_TEST_LOG";

/// Failures the user will see: a search that could not be sent or answered.
#[macro_export]
macro_rules! search_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Recoverable trouble: rejected triggers, stale completions, HTTP errors.
#[macro_export]
macro_rules! search_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Search lifecycle: submitted, completed, hit counts.
#[macro_export]
macro_rules! search_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Request and response detail such as status codes and body sizes.
#[macro_export]
macro_rules! search_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Polling noise from the wait loop.
#[macro_export]
macro_rules! search_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Sends log output from the `search_*` crates to stderr during tests.
///
/// The level comes from `SEARCH_TEST_LOG` (e.g. `trace`) and defaults to
/// `debug`. HTTP stack crates are filtered out. Calling it again, or after
/// another logger was installed, does nothing.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = std::env::var(TEST_LOG_ENV)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(log::LevelFilter::Debug);
    let config = ConfigBuilder::new()
        .add_filter_allow_str("search_")
        .build();

    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
