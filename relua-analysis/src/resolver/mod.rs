//! Module resolver — logical identifiers to concrete file paths.
//!
//! A logical identifier like `luci.controller.network` maps to a relative
//! path (`luci/controller/network`) probed under every configured search
//! root with every configured extension. Roots are tried in priority order
//! (outer loop), extensions in priority order (inner loop); the first hit
//! wins. Ties across roots are broken by configured order, never
//! alphabetically.

use std::path::{Path, PathBuf};

use relua_core::config::DiscoveryConfig;
use relua_core::types::collections::FxHashMap;

/// Outcome of resolving one logical identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier mapped to an existing file (canonicalized).
    Found(PathBuf),
    /// No root yielded a match. Recorded, never fatal.
    Unresolved,
}

/// Resolves logical module identifiers against ordered search roots.
///
/// Owns an explicit resolved-path cache scoped to this instance — one
/// resolver lives for one discovery run, so the cache can never outlive
/// the filesystem snapshot it describes.
pub struct ModuleResolver {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    cache: FxHashMap<String, Option<PathBuf>>,
}

impl ModuleResolver {
    /// Create a resolver with explicit roots and extensions.
    pub fn new(roots: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            roots,
            extensions,
            cache: FxHashMap::default(),
        }
    }

    /// Create a resolver from the discovery configuration.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(config.search_roots.clone(), config.effective_extensions())
    }

    /// Append a search root with lowest priority. No-op if already present.
    pub fn add_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        if !self.roots.contains(&root) {
            self.roots.push(root);
            // Root set changed; cached misses may now resolve.
            self.cache.retain(|_, v| v.is_some());
        }
    }

    /// The configured search roots, in priority order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve a logical identifier to a file path.
    ///
    /// Deterministic for a fixed root list, extension list, and filesystem
    /// snapshot. Identifiers with empty segments never touch the
    /// filesystem.
    pub fn resolve(&mut self, identifier: &str) -> Resolution {
        if let Some(cached) = self.cache.get(identifier) {
            return match cached {
                Some(path) => Resolution::Found(path.clone()),
                None => Resolution::Unresolved,
            };
        }

        let result = self.probe(identifier);
        self.cache.insert(identifier.to_string(), result.clone());
        match result {
            Some(path) => Resolution::Found(path),
            None => Resolution::Unresolved,
        }
    }

    /// Probe the filesystem for the identifier. Roots outer, extensions inner.
    fn probe(&self, identifier: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = identifier.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let relative: PathBuf = segments.iter().collect();
        let file_stem = segments.last()?;

        for root in &self.roots {
            for ext in &self.extensions {
                let mut candidate = root.join(&relative);
                candidate.set_file_name(format!("{file_stem}{ext}"));
                if candidate.is_file() {
                    // Canonical key; fall back to the joined path when the
                    // filesystem refuses (e.g. permission on a parent).
                    return Some(std::fs::canonicalize(&candidate).unwrap_or(candidate));
                }
            }
        }
        None
    }

    /// Derive the dot-separated module name for a resolved file.
    ///
    /// Uses the first search root containing the path; falls back to the
    /// file stem for paths outside every root.
    pub fn module_name_for(&self, path: &Path) -> String {
        for root in &self.roots {
            let canonical_root = std::fs::canonicalize(root).unwrap_or_else(|_| root.clone());
            if let Ok(relative) = path.strip_prefix(&canonical_root) {
                let mut parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                if let Some(last) = parts.last_mut() {
                    *last = self.strip_extension(last);
                }
                return parts.join(".");
            }
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.strip_extension(&name)
    }

    /// Strip the longest matching configured extension from a file name.
    fn strip_extension(&self, name: &str) -> String {
        let mut best: Option<usize> = None;
        for ext in &self.extensions {
            if name.len() > ext.len() && name.ends_with(ext.as_str()) {
                best = Some(best.map_or(ext.len(), |b| b.max(ext.len())));
            }
        }
        match best {
            Some(len) => name[..name.len() - len].to_string(),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segments_never_probe() {
        let mut resolver = ModuleResolver::new(vec![], vec![".lua".to_string()]);
        assert_eq!(resolver.resolve(""), Resolution::Unresolved);
        assert_eq!(resolver.resolve("a..b"), Resolution::Unresolved);
        assert_eq!(resolver.resolve(".a"), Resolution::Unresolved);
        assert_eq!(resolver.resolve("a."), Resolution::Unresolved);
    }

    #[test]
    fn strip_extension_prefers_longest_match() {
        let resolver = ModuleResolver::new(
            vec![],
            vec![".lua.unluac".to_string(), ".lua".to_string()],
        );
        assert_eq!(resolver.strip_extension("init.lua.unluac"), "init");
        assert_eq!(resolver.strip_extension("init.lua"), "init");
        assert_eq!(resolver.strip_extension("init"), "init");
    }
}
