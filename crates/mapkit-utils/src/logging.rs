//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    init_tracing_with(LogFormat::Pretty);
}

/// Initialize tracing subscriber with the given output format
///
/// The filter is read from `RUST_LOG` and defaults to `info`. Calling this
/// more than once keeps the first subscriber.
pub fn init_tracing_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already initialized");
    }
}
