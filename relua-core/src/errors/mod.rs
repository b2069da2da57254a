//! Error handling for relua.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod discovery_error;
pub mod error_code;
pub mod pipeline_error;
pub mod restore_error;

pub use config_error::ConfigError;
pub use discovery_error::DiscoveryError;
pub use error_code::ReluaErrorCode;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use restore_error::RestoreError;
