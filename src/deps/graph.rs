//! Recursive `@import` resolution.
//!
//! Walks imports depth-first from an entry file, collecting canonical paths
//! into a [`DependencySet`]. A path already in the set is never visited again,
//! which both removes duplicates and terminates cycles. The membership check
//! happens before recursing.

use super::{DependencySet, imports, path};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("An existing absolute folder must be provided, got `{}`", .0.display())]
    InvalidBase(PathBuf),
}

/// Import resolver rooted at a base directory.
///
/// The base is where absolute imports (`@import "/less/mixins";`) and
/// relative entry paths are resolved.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    base: PathBuf,
}

impl DependencyGraph {
    /// Create a resolver rooted at `base`.
    ///
    /// # Errors
    /// Fails immediately if `base` is not absolute or is not an existing
    /// directory.
    pub fn new(base: impl AsRef<Path>) -> Result<Self, DependencyError> {
        let base = base.as_ref();
        let text = base.to_string_lossy();

        if !path::is_absolute(&text) || !base.is_dir() {
            return Err(DependencyError::InvalidBase(base.to_path_buf()));
        }

        // Absolute imports are concatenated onto the base, so drop the
        // trailing separator to avoid `//`.
        let trimmed = text.trim_end_matches(['/', '\\']);
        let base = if trimmed.len() == text.len() {
            base.to_path_buf()
        } else {
            PathBuf::from(trimmed)
        };

        Ok(Self { base })
    }

    /// Compute every file transitively imported by `entry`.
    ///
    /// A missing entry or an unreadable file contributes nothing; this never
    /// fails.
    pub fn compute(&self, entry: &Path) -> DependencySet {
        let mut deps = DependencySet::default();
        self.compute_into(entry, &mut deps);
        deps
    }

    /// Like [`compute`](Self::compute), accumulating into an existing set.
    ///
    /// Paths already in `deps` are treated as visited.
    pub fn compute_into(&self, entry: &Path, deps: &mut DependencySet) {
        if let Some(entry) = self.locate_entry(entry) {
            self.visit(&entry, &entry, deps);
        }
    }

    /// Map an entry argument to an existing, canonical file.
    ///
    /// Relative entries are taken from the base.
    fn locate_entry(&self, entry: &Path) -> Option<PathBuf> {
        let text = entry.to_string_lossy();
        let located = if path::is_absolute(&text) {
            entry.canonicalize().ok()?
        } else {
            path::root_at(&self.base, &format!("/{text}"))
                .canonicalize()
                .ok()?
        };
        located.is_file().then_some(located)
    }

    fn visit(&self, entry: &Path, file: &Path, deps: &mut DependencySet) {
        let Ok(source) = fs::read_to_string(file) else {
            return;
        };
        let source = imports::strip_comments(&source);
        let importer_dir = file.parent().unwrap_or(Path::new(""));

        for target in imports::extract_imports(&source) {
            let target = imports::infer_extension(target);

            let Some(resolved) = path::resolve_relative_to(&self.base, importer_dir, &target)
            else {
                continue;
            };
            if !resolved.is_file() || deps.contains(&resolved) {
                continue;
            }

            // The entry is always visited. It only becomes a member when it
            // imports itself directly, never when a cycle leads back to it.
            if resolved == entry {
                if file == entry {
                    deps.insert(resolved);
                }
                continue;
            }

            let leaf = imports::is_leaf(&resolved);
            deps.insert(resolved.clone());
            if !leaf {
                self.visit(entry, &resolved, deps);
            }
        }
    }
}
