//! Tracing initialization and configuration.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use super::LogFormat;

/// Initializes the tracing subscriber for structured logging.
///
/// The log level is taken from `RUST_LOG` and defaults to `info`.
///
/// ```bash
/// RUST_LOG=debug ipreverser
/// RUST_LOG=ipreverser_server=trace,tower_http=debug ipreverser
/// ```
pub(super) fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_level(true).with_ansi(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

/// Creates an environment filter for tracing.
fn create_env_filter() -> anyhow::Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", EnvFilter::DEFAULT_ENV)),
        Err(_) => Ok(EnvFilter::new("info")),
    }
}
