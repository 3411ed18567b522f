//! Logging initialisation.
//!
//! The library only emits through the [`log`] facade, so nothing is printed
//! until a logger is installed. Verbosity follows `RUST_LOG`, for example:
//! ```bash
//! RUST_LOG=mapmatch=debug
//! ```
//!
//! With the `tracing` feature enabled, [`initialize_tracer`] installs a
//! `tracing_subscriber` formatter instead, which also picks up the spans
//! recorded around decoding steps.

/// Installs `env_logger` as the global logger. Calling this more
/// than once, or after another logger was installed, has no effect.
pub fn initialize_logger() {
    if let Err(err) = env_logger::try_init() {
        log::debug!("Logger already initialised: {err}");
    }
}

/// Initialises the tracer, using tracing subscription.
/// This is optional, not calling this function will simply
/// not log traces.
#[cfg(feature = "tracing")]
pub fn initialize_tracer() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer();

    // Initialise tracing with subscribers and environment filter
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer);

    if let Err(err) = registry.try_init() {
        log::debug!("Tracer already initialised: {err}");
    }
}
