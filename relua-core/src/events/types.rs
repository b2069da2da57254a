//! Event payload types for the discovery and restoration lifecycle.

use std::path::PathBuf;

/// Payload for `on_discovery_started`.
#[derive(Debug, Clone)]
pub struct DiscoveryStartedEvent {
    pub root: PathBuf,
}

/// Payload for `on_file_discovered`.
#[derive(Debug, Clone)]
pub struct FileDiscoveredEvent {
    pub path: PathBuf,
    /// The logical identifier that led here; `None` for the root file.
    pub identifier: Option<String>,
}

/// Payload for `on_discovery_progress`.
#[derive(Debug, Clone)]
pub struct DiscoveryProgressEvent {
    pub processed: usize,
    pub pending: usize,
}

/// Payload for `on_discovery_complete`.
#[derive(Debug, Clone)]
pub struct DiscoveryCompleteEvent {
    pub total_nodes: usize,
    pub unresolved_references: usize,
    pub read_errors: usize,
    pub duration_ms: u64,
}

/// Payload for `on_cycle_detected`.
#[derive(Debug, Clone)]
pub struct CycleDetectedEvent {
    pub members: Vec<PathBuf>,
}

/// Payload for `on_restore_started`.
#[derive(Debug, Clone)]
pub struct RestoreStartedEvent {
    pub total_records: usize,
}

/// Payload for `on_restore_progress`.
#[derive(Debug, Clone)]
pub struct RestoreProgressEvent {
    pub processed: usize,
    pub total: usize,
}

/// Payload for `on_restore_complete`.
#[derive(Debug, Clone)]
pub struct RestoreCompleteEvent {
    pub restored: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
