use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured stdout tracing. Call once at service startup.
///
/// JSON output; the filter comes from `RUST_LOG`, falling back to `default_directive`
/// (e.g. `"info,sqlx=warn"`) when the variable is unset or invalid.
///
/// Later calls are ignored.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}
