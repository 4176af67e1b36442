//! Structured logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber, writing to stderr.
///
/// # Arguments
/// * `filter` - Optional filter directive (e.g. "info", "envlog=debug");
///   falls back to `RUST_LOG`, then to "trace"
/// * `json` - Render events as JSON objects instead of plain text
pub fn init_logging(filter: Option<&str>, json: bool) -> anyhow::Result<()> {
    let filter = if let Some(directive) = filter {
        EnvFilter::try_new(directive)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
