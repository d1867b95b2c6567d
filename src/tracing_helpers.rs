//! Logging setup.
//!
//! Log statements are gated with `#[cfg(feature = "tracing")]`; without the
//! feature (the default) they are compiled out and the execution loop pays
//! nothing for them.
//!
//! ```bash
//! # Plain build, no logging overhead
//! cargo run --release -- run --variant papaya_hash_map/seize
//!
//! # With structured logs
//! RUST_LOG=mapbench=debug cargo run --release --features tracing -- run
//! ```
//!
//! Setup-path functions carry
//! `#[cfg_attr(feature = "tracing", tracing::instrument(...))]` so their spans
//! show up when the feature is on.

/// Install a console subscriber filtered by `RUST_LOG` (default `mapbench=info`).
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mapbench=info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}

/// No-op without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}
