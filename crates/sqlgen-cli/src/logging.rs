//! Logging setup for the sqlgen binary
//!
//! Log lines go to stderr so the generated script on stdout stays clean.
//! `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!(filter = %default_filter, "Logging system initialized");
    Ok(())
}
