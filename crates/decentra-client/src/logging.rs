//! Logging bootstrap for bot binaries.
//!
//! The SDK itself only emits `tracing` events; embedding programs decide how
//! to subscribe. [`init`] is the one-call setup the demo bots use: an fmt
//! subscriber with an `EnvFilter` built from (in order of preference) an
//! explicit directive, the `RUST_LOG` environment variable, or `info`.

use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init(filter: Option<&str>) {
    let env_filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
