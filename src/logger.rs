use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global tracing subscriber used by the meter.
///
/// The `CALLMETER_LOG` or `RUST_LOG` environment variables override the
/// level; `verbose` raises the default from `info` to `debug`. Calling this
/// more than once keeps the first subscriber.
pub fn init_logging(verbose: bool, no_color: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = std::env::var("CALLMETER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        tracing::debug!("Logging already initialized: {}", err);
    }
}
