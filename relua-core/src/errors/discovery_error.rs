//! Discovery errors.
//!
//! Only run-fatal conditions live here. Per-node conditions (a file that
//! cannot be read, an identifier that matches nothing) are recorded on the
//! node and surfaced through stats, not as `Err`.

use super::error_code::{self, ReluaErrorCode};

/// Errors that abort a discovery run.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The root file could not be read. Without it no graph can be built.
    #[error("Root file unreadable: {path}: {message}")]
    RootUnreadable { path: String, message: String },

    #[error("Discovery cancelled")]
    Cancelled,
}

impl ReluaErrorCode for DiscoveryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RootUnreadable { .. } => error_code::DISCOVERY_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
