//! Tracing setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `default_filter`
/// (and to `info` if that does not parse either).
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a fmt subscriber on stderr so stdout stays clean for reports
/// and JSON. Calling it twice is harmless.
pub fn init(default_filter: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("Logging initialised (fallback filter '{}')", default_filter);
    }
}
