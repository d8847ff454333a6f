// Logging module - Logging infrastructure
use crate::domain::error::{SerialTermError, SerialTermResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to stderr so stdout carries only the transcript.
///
/// `RUST_LOG` overrides `level`; `verbose` forces debug output for this crate.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(level: &str, verbose: bool) -> SerialTermResult<()> {
    let level = if verbose { "debug" } else { level };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("serialterm={},warn", level)).map_err(|e| {
            SerialTermError::Config {
                message: format!("Invalid log level '{}': {}", level, e),
            }
        })?,
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_names(true),
        )
        .try_init();

    if installed.is_ok() {
        tracing::debug!("SerialTerm logging system initialized");
    }
    Ok(())
}
