//! ContentSource trait — the filesystem collaborator seam.
//!
//! Discovery never touches the filesystem directly; it reads through a
//! `ContentSource`. The bundled implementation in relua-analysis wraps
//! `std::fs`; embedders can substitute sandboxed, archived, or remote
//! sources. Bounded-timeout behavior belongs to the implementation that
//! owns the I/O — the engine passes the configured timeout through as an
//! opaque setting and never blocks on anything but the collaborator call.

use std::path::{Path, PathBuf};

/// A single failed read. Always node-local: discovery records it on the
/// node and continues (only a root-file failure aborts the run).
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to read {path}: {message}")]
pub struct ReadFailure {
    pub path: PathBuf,
    pub message: String,
}

impl ReadFailure {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Provider of file content for discovery.
pub trait ContentSource: Send + Sync {
    /// Read the full text of `path`.
    fn read(&self, path: &Path) -> Result<String, ReadFailure>;
}
