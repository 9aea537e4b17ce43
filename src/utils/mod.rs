//! Utility modules shared by the compiler driver and the CLI commands.

pub mod exec;
pub mod log;
pub mod minify;

use crate::deps::path::normalize_separators;
use std::path::Path;

/// Format a path relative to `root` with `/` separators, for log display.
///
/// `/proj/web/less/main.less` → `web/less/main.less`
pub fn rel_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_separators(&rel.to_string_lossy()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_path_under_root() {
        assert_eq!(
            rel_path(Path::new("/proj/web/less/main.less"), Path::new("/proj")),
            "web/less/main.less"
        );
    }

    #[test]
    fn test_rel_path_outside_root() {
        assert_eq!(
            rel_path(Path::new("/other/main.less"), Path::new("/proj")),
            "/other/main.less"
        );
    }
}
