//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `default_filter`
/// (for example `"info"` or `"foads=debug"`). Calling this twice is harmless;
/// the second installation attempt is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    tracing::debug!(default_filter, "Tracing initialized");
}
