//! Tracing subscriber setup for the demo binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::error::{DemoError, Result};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "UNDOGRAPH_LOG";

/// Install a global subscriber writing to stderr.
///
/// The filter comes from `UNDOGRAPH_LOG`, then `RUST_LOG`, then `default_level`.
pub fn init_tracing(default_level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| DemoError::Logging(e.to_string()))?;

    let subscriber = Registry::default().with(filter);
    let installed = if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(subscriber.with(layer))
    } else {
        let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(subscriber.with(layer))
    };
    installed.map_err(|e| DemoError::Logging(e.to_string()))
}
