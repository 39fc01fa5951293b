//! Logger setup for binaries and tests that embed the backend.
//!
//! The backend itself only uses the `log` macros; nothing is printed until
//! the embedding program installs a logger with one of these functions.

use env_logger::{Builder, Env};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Install `env_logger`, honoring `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    init_logging_with_filter(DEFAULT_FILTER);
}

/// Install `env_logger` with `filter` as the fallback for `RUST_LOG`
pub fn init_logging_with_filter(filter: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
}

/// Logger for unit and integration tests; output is captured per test
pub fn init_test_logging() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
