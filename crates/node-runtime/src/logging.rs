//! # Logging
//!
//! Global `tracing` subscriber set up from [`LoggingConfig`].

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::container::LoggingConfig;

/// Install the global subscriber. Returns `false` when one was already
/// installed, so repeated calls are harmless.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<bool> {
    let filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid log filter {:?}", config.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::info!("[runtime] logging initialised at {}", config.level);
    }
    Ok(installed)
}
