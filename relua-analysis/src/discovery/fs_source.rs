//! Filesystem-backed content source.

use std::path::Path;

use relua_core::config::DiscoveryConfig;
use relua_core::traits::content_source::{ContentSource, ReadFailure};

/// Reads file content from the local filesystem.
///
/// Enforces the configured size bound. Local reads complete or fail fast;
/// sources that wrap slower transports (archives, network mounts) are
/// expected to honor the configured read timeout themselves.
pub struct FsContentSource {
    max_file_size: u64,
}

impl FsContentSource {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(config.effective_max_file_size())
    }
}

impl ContentSource for FsContentSource {
    fn read(&self, path: &Path) -> Result<String, ReadFailure> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| ReadFailure::new(path, e.to_string()))?;
        if metadata.len() > self.max_file_size {
            return Err(ReadFailure::new(
                path,
                format!(
                    "file size {} exceeds limit {}",
                    metadata.len(),
                    self.max_file_size
                ),
            ));
        }

        let bytes =
            std::fs::read(path).map_err(|e| ReadFailure::new(path, e.to_string()))?;
        // Decompiler output is not always clean UTF-8; replace rather than fail.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
