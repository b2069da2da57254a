//! Collection aliases over rustc-hash for hot maps and sets.

pub use rustc_hash::{FxHashMap, FxHashSet};
