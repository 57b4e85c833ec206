//! Console logging setup shared by the binaries.
//!
//! Library modules only emit `tracing` events; installing the subscriber is
//! left to the entry points so tests run without global state.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stdout subscriber. `RUST_LOG` overrides the level chosen here.
pub fn init(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}
