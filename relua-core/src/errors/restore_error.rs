//! Restoration collaborator errors.

use super::error_code::{self, ReluaErrorCode};

/// Errors returned by the external restoration collaborator for one record.
/// Always node-local; the pipeline collects them and continues.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("Restoration failed for {key}: {message}")]
    Failed { key: String, message: String },

    #[error("Restoration collaborator unavailable: {message}")]
    Unavailable { message: String },
}

impl ReluaErrorCode for RestoreError {
    fn error_code(&self) -> &'static str {
        error_code::RESTORE_ERROR
    }
}
