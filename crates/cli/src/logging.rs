//! Logging setup for the CLI
//!
//! Console output goes to stderr so stdout stays free for the run summary.

use crate::config::{LogFormat, LoggingConfig};
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,devsweep=info";
const LOG_FILE_PREFIX: &str = "devsweep.log";

/// Initialize the global subscriber
///
/// Returns the file writer guard when a log directory is configured; keep it
/// alive until exit or buffered lines are lost.
///
/// # Environment Variables
///
/// - `RUST_LOG`: overrides the configured filter
/// - `DEVSWEEP_LOGGING__FORMAT`: `pretty` (default) or `json`
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let directive = config.filter.as_deref().unwrap_or(DEFAULT_FILTER);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .with_context(|| format!("Invalid log filter: {}", directive))?;

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
