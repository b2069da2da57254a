//! relua-core: foundation crate for the relua restoration engine.
//!
//! Provides the pieces every subsystem leans on:
//! - Errors: one enum per subsystem, `thiserror` only, stable error codes
//! - Config: TOML-based, layered resolution with validation
//! - Events: synchronous dispatcher for discovery/restoration lifecycle
//! - Traits: cancellation token, content-source collaborator seam
//! - Types: shared collection aliases
//! - Telemetry: tracing subscriber initialization

pub mod config;
pub mod errors;
pub mod events;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use config::{DiscoveryConfig, ReluaConfig, RestoreConfig, RuntimeOverrides};
pub use errors::{
    ConfigError, DiscoveryError, PipelineError, PipelineResult, ReluaErrorCode, RestoreError,
};
pub use events::{EventDispatcher, ReluaEventHandler};
pub use traits::cancellation::{Cancellable, CancellationToken};
pub use traits::content_source::{ContentSource, ReadFailure};
