//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level`; an unparsable level falls back to
/// `warn`. Calling this again once a subscriber is set does nothing.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
