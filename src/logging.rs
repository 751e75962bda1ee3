//! Diagnostic logging setup.
//!
//! Logs are structured `tracing` events written to standard error. The
//! configured [`LogLevel`] sets the default filter; `RUST_LOG` directives are
//! layered on top when present.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Builds the event filter for `level`, honouring `RUST_LOG`.
#[must_use]
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.level_filter().into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(level: LogLevel) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Logging already initialised");
    }
}
