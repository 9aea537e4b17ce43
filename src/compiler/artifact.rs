//! Compiled CSS artifacts.
//!
//! Every artifact starts with [`HEADER`] followed by a blank line. The header
//! doubles as the marker that tells a managed artifact apart from a
//! hand-written CSS file sharing the output tree.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

/// First line of every generated CSS file.
pub const HEADER: &str = "/* This CSS is autocompiled by LESS parser. Don't edit it manually. */";

/// Longest first line read when checking for [`HEADER`].
const HEADER_SCAN_LIMIT: u64 = 1024;

/// Map a source path under `less_root` to its artifact under `css_root`.
///
/// The root prefix is swapped and a trailing `.less` extension becomes
/// `.css`. Returns `None` for sources outside `less_root`.
///
/// `/web/less/a/main.less` → `/web/css/a/main.css`
pub fn artifact_path_for(source: &Path, less_root: &Path, css_root: &Path) -> Option<PathBuf> {
    let rel = source.strip_prefix(less_root).ok()?;
    let mut artifact = css_root.join(rel);
    if artifact.extension().is_some_and(|ext| ext == "less") {
        artifact.set_extension("css");
    }
    Some(artifact)
}

/// Check whether a CSS file was generated by us.
///
/// Reads the first line (at most 1 KiB) and compares it to [`HEADER`].
/// Unreadable files are not managed.
pub fn is_managed_artifact(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut line = Vec::new();
    let mut reader = BufReader::new(file).take(HEADER_SCAN_LIMIT);
    if reader.read_until(b'\n', &mut line).is_err() {
        return false;
    }

    let line = line.strip_suffix(b"\n").unwrap_or(&line[..]);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line == HEADER.as_bytes()
}

/// Create the artifact's parent directory if it is missing.
///
/// A freshly created directory is made world-writable so that other users
/// running the pipeline can write into it.
pub fn ensure_parent_dir(artifact: &Path) -> io::Result<()> {
    let Some(parent) = artifact.parent() else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(parent)?;
    set_mode(parent, 0o777)
}

/// Write the stamped artifact.
///
/// `fresh` must be decided before the compiler runs, since the compiler may
/// create `path` itself. Fresh artifacts get relaxed permissions; an existing
/// artifact keeps whatever permissions it had.
pub fn write_artifact(path: &Path, body: &str, fresh: bool) -> io::Result<()> {
    fs::write(path, format!("{HEADER}\n\n{body}"))?;
    if fresh {
        set_mode(path, 0o666)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
