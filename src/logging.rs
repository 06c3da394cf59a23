//! Utilities for logging.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` overrides `level` when set. Calling this more than once is
/// harmless; later calls are ignored.
pub fn configure_global_logger(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
