//! Tracing subscriber initialization.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// Filter is taken from `RELUA_LOG` (standard `EnvFilter` syntax),
/// defaulting to `info`. Safe to call more than once; later calls are
/// no-ops, as is running under an embedder that already installed a
/// subscriber.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("RELUA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
