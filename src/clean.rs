//! Removal of generated stylesheets.
//!
//! Only files carrying the autocompile header are touched; hand-written CSS
//! living in the same tree survives.

use crate::{compiler::artifact::is_managed_artifact, config::LessConfig, log, utils::rel_path};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Managed artifacts under `css_root`, sorted by path.
pub fn find_managed_artifacts(css_root: &Path) -> Vec<PathBuf> {
    WalkDir::new(css_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "css"))
        .filter(|e| is_managed_artifact(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Delete every managed artifact under the CSS root.
///
/// Returns the number of files removed.
pub fn clean_artifacts(config: &LessConfig) -> Result<usize> {
    let artifacts = find_managed_artifacts(config.css_dir());

    for path in &artifacts {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        log!("clean"; "{}", rel_path(path, &config.root));
    }

    log!("clean"; "removed {} stylesheets", artifacts.len());
    Ok(artifacts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::artifact::write_artifact;
    use tempfile::tempdir;

    #[test]
    fn test_clean_only_managed() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let css = root.join("web/css");
        fs::create_dir_all(css.join("pages")).unwrap();

        write_artifact(&css.join("main.css"), "body{}", true).unwrap();
        write_artifact(&css.join("pages/home.css"), "h1{}", true).unwrap();
        fs::write(css.join("vendor.css"), "/* vendor */").unwrap();
        fs::write(css.join("notes.txt"), "").unwrap();

        let mut config = LessConfig::default();
        config.root = root.clone();
        config.paths.css = css.clone();

        assert_eq!(
            find_managed_artifacts(&css),
            vec![css.join("main.css"), css.join("pages/home.css")]
        );
        assert_eq!(clean_artifacts(&config).unwrap(), 2);
        assert!(!css.join("main.css").exists());
        assert!(!css.join("pages/home.css").exists());
        assert!(css.join("vendor.css").exists());
        assert!(css.join("notes.txt").exists());
    }

    #[test]
    fn test_clean_missing_dir() {
        let dir = tempdir().unwrap();
        let mut config = LessConfig::default();
        config.paths.css = dir.path().join("missing");

        assert_eq!(clean_artifacts(&config).unwrap(), 0);
    }
}
