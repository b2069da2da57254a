//! Stable error codes for machine-readable reporting.

/// Configuration load or validation failure.
pub const CONFIG_ERROR: &str = "RELUA_CONFIG_ERROR";
/// Discovery failure that aborts the run.
pub const DISCOVERY_ERROR: &str = "RELUA_DISCOVERY_ERROR";
/// Restoration collaborator failure.
pub const RESTORE_ERROR: &str = "RELUA_RESTORE_ERROR";
/// Operation cancelled via the cancellation token.
pub const CANCELLED: &str = "RELUA_CANCELLED";

/// Maps an error to its stable code.
///
/// Codes never change once shipped; downstream consumers key on them.
pub trait ReluaErrorCode {
    fn error_code(&self) -> &'static str;
}
