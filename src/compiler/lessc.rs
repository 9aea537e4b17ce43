//! The stylesheet compiler collaborator.
//!
//! The orchestrator only knows [`StyleCompiler`]. [`Lessc`] is the production
//! implementation; tests substitute closures.

use crate::exec;
use crate::utils::exec::FilterRule;
use std::{fs, path::Path};
use thiserror::Error;

/// A compiler invocation that did not produce CSS.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CompileFailure {
    /// Raw compiler output describing the failure
    pub message: String,
}

impl CompileFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns one LESS source into CSS.
pub trait StyleCompiler {
    /// Compile `source`, returning the CSS text.
    ///
    /// Implementations may write `dest` themselves; the caller overwrites it
    /// with the stamped result afterwards.
    fn compile_file(&self, source: &Path, dest: &Path) -> Result<String, CompileFailure>;
}

impl<F> StyleCompiler for F
where
    F: Fn(&Path, &Path) -> Result<String, CompileFailure>,
{
    fn compile_file(&self, source: &Path, dest: &Path) -> Result<String, CompileFailure> {
        self(source, dest)
    }
}

/// Deprecation chatter printed by `lessc` on success.
const LESSC_FILTER: FilterRule = FilterRule::new(&["npm WARN", "(node:"]);

/// Runs `<command...> <source> <dest>` and reads the written file back.
#[derive(Debug, Clone, Copy)]
pub struct Lessc<'a> {
    command: &'a [String],
    root: &'a Path,
}

impl<'a> Lessc<'a> {
    /// `root` is the working directory of the subprocess.
    pub const fn new(command: &'a [String], root: &'a Path) -> Self {
        Self { command, root }
    }
}

impl StyleCompiler for Lessc<'_> {
    fn compile_file(&self, source: &Path, dest: &Path) -> Result<String, CompileFailure> {
        exec!(filter=&LESSC_FILTER; self.root; self.command; source, dest)
            .map_err(|e| CompileFailure::new(format!("{e:#}")))?;

        fs::read_to_string(dest).map_err(|e| {
            CompileFailure::new(format!(
                "compiler produced no readable output at `{}`: {e}",
                dest.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_closure_is_compiler() {
        let compiler = |source: &Path, _dest: &Path| -> Result<String, CompileFailure> {
            Ok(format!("/* {} */", source.display()))
        };
        let css = compiler
            .compile_file(Path::new("a.less"), Path::new("a.css"))
            .unwrap();
        assert_eq!(css, "/* a.less */");
    }

    #[cfg(unix)]
    #[test]
    fn test_lessc_reads_dest() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("main.less");
        let dest = dir.path().join("main.css");
        fs::write(&source, "body{}").unwrap();

        // Stand-in compiler: copy source to dest
        let command = vec!["cp".to_string()];
        let css = Lessc::new(&command, dir.path())
            .compile_file(&source, &dest)
            .unwrap();
        assert_eq!(css, "body{}");
    }

    #[cfg(unix)]
    #[test]
    fn test_lessc_failure_carries_output() {
        let dir = tempdir().unwrap();
        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo 'ParseError: Unrecognised input' >&2; exit 1".to_string(),
        ];

        let err = Lessc::new(&command, dir.path())
            .compile_file(&dir.path().join("main.less"), &dir.path().join("main.css"))
            .unwrap_err();
        assert!(err.message.contains("ParseError: Unrecognised input"));
    }

    #[cfg(unix)]
    #[test]
    fn test_lessc_missing_output() {
        let dir = tempdir().unwrap();
        let command = vec!["true".to_string()];

        let err = Lessc::new(&command, dir.path())
            .compile_file(&dir.path().join("main.less"), &dir.path().join("main.css"))
            .unwrap_err();
        assert!(err.message.contains("no readable output"));
    }
}
