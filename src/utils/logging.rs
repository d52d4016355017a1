use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the relay.
///
/// `RUST_LOG` takes precedence when set, so the relay can be turned up to
/// debug or trace without a rebuild; otherwise `default_level` applies.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Use try_init so tests and libraries can call this multiple times without panicking
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
