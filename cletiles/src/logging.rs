//! Tracing subscriber setup for binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` when set; otherwise defaults to `info` (or `debug`
/// with `verbose`). Safe to call more than once - later calls are no-ops.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "cletiles=debug" } else { "cletiles=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
