//! Path handling for `@import` resolution.
//!
//! Import targets are plain strings written by hand in stylesheets, so the
//! absolute-path check here is textual and understands both Unix (`/a/b`) and
//! drive-letter (`C:\a\b`) conventions regardless of the host platform.
//!
//! An absolute import is rooted at the tracked base directory rather than at
//! the filesystem root: `@import "/less/mixins";` under base `/srv/web`
//! resolves to `/srv/web/less/mixins.less`.

use std::{
    borrow::Cow,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Check if a path is absolute.
///
/// True when the path starts with `/` or `\`, or when it is longer than three
/// characters and starts with `<letter>:` followed by a separator.
///
/// ```ignore
/// assert!(is_absolute("/a/b"));
/// assert!(is_absolute("C:\\a\\b"));
/// assert!(!is_absolute("a/b"));
/// ```
pub fn is_absolute(path: &str) -> bool {
    match path.as_bytes() {
        [b'/' | b'\\', ..] => true,
        [drive, b':', b'/' | b'\\', _, ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Convert every `\` separator to `/`.
///
/// Used for display and comparison; returns the input untouched when it has
/// no backslashes.
pub fn normalize_separators(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Concatenate `tail` onto `base` as raw text.
///
/// Unlike [`Path::join`], an absolute `tail` does not replace `base`.
pub fn root_at(base: &Path, tail: &str) -> PathBuf {
    let mut joined = OsString::from(base.as_os_str());
    joined.push(tail);
    PathBuf::from(joined)
}

/// Resolve an import target to its canonical filesystem path.
///
/// Absolute targets are concatenated onto `base`; relative targets are
/// resolved against `importer_dir`, the directory of the importing file.
///
/// Returns `None` when canonicalization fails (the target does not exist or
/// cannot be read). Callers treat that as an unresolvable import.
pub fn resolve_relative_to(base: &Path, importer_dir: &Path, target: &str) -> Option<PathBuf> {
    let candidate = if is_absolute(target) {
        root_at(base, target)
    } else {
        importer_dir.join(target)
    };
    candidate.canonicalize().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_absolute_unix() {
        assert!(is_absolute("/a/b"));
        assert!(is_absolute("/"));
        assert!(is_absolute("\\server\\share"));
    }

    #[test]
    fn test_is_absolute_drive_letter() {
        assert!(is_absolute("C:\\a\\b"));
        assert!(is_absolute("d:/styles"));
        // Needs more than three characters
        assert!(!is_absolute("C:\\"));
        assert!(!is_absolute("1:\\a"));
        assert!(!is_absolute("C:a\\b"));
    }

    #[test]
    fn test_is_absolute_relative() {
        assert!(!is_absolute("a/b"));
        assert!(!is_absolute("./a"));
        assert!(!is_absolute("../a"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators("a\\b\\c.less"), "a/b/c.less");
        assert_eq!(normalize_separators("C:\\web\\less"), "C:/web/less");
        assert!(matches!(normalize_separators("a/b"), Cow::Borrowed("a/b")));
    }

    #[test]
    fn test_root_at_keeps_base() {
        let joined = root_at(Path::new("/srv/web"), "/less/main.less");
        assert_eq!(joined, PathBuf::from("/srv/web/less/main.less"));
    }

    #[test]
    fn test_resolve_relative_target() {
        let dir = tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("less/partials")).unwrap();
        fs::write(base.join("less/partials/a.less"), "").unwrap();

        let resolved = resolve_relative_to(&base, &base.join("less"), "partials/a.less");
        assert_eq!(resolved, Some(base.join("less/partials/a.less")));
    }

    #[test]
    fn test_resolve_dotted_paths_to_same_file() {
        let dir = tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("less/sub")).unwrap();
        fs::write(base.join("less/shared.less"), "").unwrap();

        let direct = resolve_relative_to(&base, &base.join("less"), "shared.less");
        let dotted = resolve_relative_to(&base, &base.join("less/sub"), "../shared.less");
        let curdir = resolve_relative_to(&base, &base.join("less"), "./sub/../shared.less");
        assert!(direct.is_some());
        assert_eq!(direct, dotted);
        assert_eq!(direct, curdir);
    }

    #[test]
    fn test_resolve_absolute_target_under_base() {
        let dir = tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("less")).unwrap();
        fs::write(base.join("less/mixins.less"), "").unwrap();

        // The importer directory plays no part for absolute targets
        let resolved = resolve_relative_to(&base, Path::new("/nowhere"), "/less/mixins.less");
        assert_eq!(resolved, Some(base.join("less/mixins.less")));
    }

    #[test]
    fn test_resolve_missing_target() {
        let dir = tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        assert_eq!(resolve_relative_to(&base, &base, "missing.less"), None);
        assert_eq!(resolve_relative_to(&base, &base, "/missing.less"), None);
    }
}
