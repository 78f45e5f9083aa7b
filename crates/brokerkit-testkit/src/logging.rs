//! Test logging setup
//!
//! Installs a `tracing_subscriber` fmt subscriber that writes through the
//! test harness capture. Safe to call from every test: only the first call
//! in a process installs anything.

use brokerkit_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install test logging with the default `info` filter, unless `RUST_LOG` is set
pub fn init_test_logging() {
    init_test_logging_with(&LoggingConfig::default());
}

/// Install test logging filtered by `RUST_LOG`, falling back to `config.filter`
///
/// Returns whether this call installed the subscriber.
pub fn init_test_logging_with(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}
