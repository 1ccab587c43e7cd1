//! Logging setup
//!
//! Installs a `tracing` fmt subscriber. `RUST_LOG` overrides the default
//! filter, e.g. `RUST_LOG=svd_explorer=debug`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "svd_explorer=info,warn";

/// Install the global subscriber. Call once, before anything logs.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {}", err);
    }
}
