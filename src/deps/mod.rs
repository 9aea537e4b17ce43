//! `@import` dependency tracking for LESS sources.
//!
//! - **path**: absolute-path detection and import target resolution
//! - **imports**: `@import` extraction and extension inference
//! - **graph**: recursive resolution into a [`DependencySet`]
//!
//! # Flow
//!
//! ```text
//! entry.less ──► strip_comments() ──► extract_imports() ──► infer_extension()
//!     ▲                                                           │
//!     │                                                           ▼
//!     └──────────── recurse (unless visited / css leaf) ◄── resolve_relative_to()
//! ```

mod graph;
pub mod imports;
pub mod path;

pub use graph::{DependencyError, DependencyGraph};

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

/// Canonical paths of every file an entry transitively imports.
///
/// Ordered so that listings are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    paths: BTreeSet<PathBuf>,
}

impl DependencySet {
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Add a path. Returns false if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_deduplicates() {
        let mut set = DependencySet::default();
        assert!(set.insert(PathBuf::from("/a.less")));
        assert!(!set.insert(PathBuf::from("/a.less")));
        assert_eq!(set.len(), 1);
        assert!(set.contains(Path::new("/a.less")));
    }
}
