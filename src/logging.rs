use tracing_subscriber::EnvFilter;

/// Initialise logging at `info`, or at `debug` when the settings file asks
/// for it. Only in debug mode may `RUST_LOG` override the filter.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    // A subscriber may already be installed by tests or an embedding host.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
