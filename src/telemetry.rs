//! Tracing subscriber setup.

use crate::config::{LoggingConfig, ValidationError};

/// Install the global `tracing` subscriber described by `config`.
///
/// Returns `Ok(false)` if a global subscriber was already installed (e.g.
/// by a test harness); the existing one stays in place.
///
/// # Errors
///
/// Returns `InvalidLogFilter` if the filter directive does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, ValidationError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(json = config.json, "tracing subscriber installed");
    }
    Ok(installed)
}
