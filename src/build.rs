//! Stylesheet pass orchestration.
//!
//! Finds the entry stylesheets and runs them through the compiler.
//!
//! # Architecture
//!
//! ```text
//! compile_all()
//!     │
//!     ├── collect_entries()  ──► *.less under [paths.less], minus _partials
//!     │
//!     └── Orchestrator::process_all()
//!             │
//!             └── per entry: staleness check ──► lessc ──► stamped CSS
//! ```

use crate::{
    compiler::{CompileLog, Lessc, Orchestrator, PassSummary},
    config::LessConfig,
    deps::DependencyGraph,
    log,
    utils::rel_path,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Entry stylesheet extension
const LESS_EXTENSION: &str = "less";

/// Prefix of partials that are only ever imported
const PARTIAL_PREFIX: char = '_';

/// Collect entry stylesheets under `less_root`, sorted by path.
///
/// Symlinks are followed. Files whose name starts with `_` are partials and
/// are left out.
pub fn collect_entries(less_root: &Path) -> Vec<PathBuf> {
    WalkDir::new(less_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !name.starts_with(PARTIAL_PREFIX)
        })
        .filter(|e| e.path().extension().is_some_and(|ext| ext == LESS_EXTENSION))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Run one compilation pass over every entry.
///
/// Records land in `log` even when the pass aborts.
pub fn compile_all(config: &LessConfig, log: &mut CompileLog) -> Result<PassSummary> {
    let entries = collect_entries(config.less_dir());
    if entries.is_empty() {
        log!("compile"; "no stylesheets in {}", rel_path(config.less_dir(), &config.root));
        return Ok(PassSummary::default());
    }

    let lessc = Lessc::new(&config.compile.command, &config.root);
    let orchestrator = Orchestrator::new(config, &lessc)?;

    let summary = orchestrator
        .process_all(&entries, log)
        .context("Compilation aborted")?;

    log_summary(&summary, log, &config.root);
    Ok(summary)
}

fn log_summary(summary: &PassSummary, log: &CompileLog, root: &Path) {
    if log.records().is_empty() {
        log!("compile"; "{} stylesheets up to date", summary.fresh);
        return;
    }

    let mut parts = vec![format!("{} compiled", log.succeeded())];
    if log.failed() > 0 {
        parts.push(format!("{} failed", log.failed()));
    }
    if summary.fresh > 0 {
        parts.push(format!("{} fresh", summary.fresh));
    }
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped));
    }
    log!("compile"; "{} in {:.0?}", parts.join(", "), log.total_elapsed());

    if !log.errors().is_empty() {
        let failed: Vec<_> = log.errors().keys().map(|p| rel_path(p, root)).collect();
        log!("error"; "failed: {}", failed.join(", "));
    }
}

/// Machine-readable result of one pass, printed by `compile --json`.
#[derive(Debug, Serialize)]
pub struct PassReport<'a> {
    /// `None` when the pass aborted
    pub summary: Option<PassSummary>,
    #[serde(flatten)]
    pub log: &'a CompileLog,
}

impl PassReport<'_> {
    /// Write the report as pretty JSON followed by a newline.
    pub fn write_to(&self, mut out: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Print every file `entry` transitively imports.
///
/// A relative `entry` is looked up under the document root.
pub fn print_dependencies(config: &LessConfig, entry: &Path) -> Result<()> {
    let graph = DependencyGraph::new(config.web_dir())?;
    let deps = graph.compute(entry);

    let display = rel_path(entry, &config.root);
    if deps.is_empty() {
        log!("deps"; "{display} has no resolvable imports");
        return Ok(());
    }

    log!("deps"; "{display}: {} files", deps.len());
    for dep in &deps {
        println!("{}", dep.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_collect_entries() {
        let dir = tempdir().unwrap();
        let less = dir.path();
        touch(&less.join("main.less"));
        touch(&less.join("_variables.less"));
        touch(&less.join("pages/home.less"));
        touch(&less.join("pages/_grid.less"));
        touch(&less.join("vendor/reset.css"));
        touch(&less.join("notes.txt"));

        let entries = collect_entries(less);
        assert_eq!(
            entries,
            vec![less.join("main.less"), less.join("pages/home.less")]
        );
    }

    #[test]
    fn test_collect_entries_underscore_dir_is_walked() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("_shared/theme.less"));

        assert_eq!(collect_entries(dir.path()), vec![dir.path().join("_shared/theme.less")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_entries_follows_symlinks() {
        let dir = tempdir().unwrap();
        let outside = dir.path().join("outside");
        touch(&outside.join("linked.less"));
        let less = dir.path().join("less");
        fs::create_dir_all(&less).unwrap();
        std::os::unix::fs::symlink(&outside, less.join("ext")).unwrap();

        assert_eq!(collect_entries(&less), vec![less.join("ext/linked.less")]);
    }

    #[test]
    fn test_collect_entries_missing_root() {
        let dir = tempdir().unwrap();
        assert!(collect_entries(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_pass_report_json() {
        let mut log = CompileLog::default();
        log.record_error(Path::new("/web/less/a.less"), "boom".into());
        let report = PassReport {
            summary: None,
            log: &log,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["summary"].is_null());
        assert_eq!(json["errors"]["/web/less/a.less"], "boom");
        assert!(json["records"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_pass_writes_only_the_report() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("web/less")).unwrap();
        let mut config = LessConfig::default();
        config.paths.web = root.join("web");
        config.paths.less = root.join("web/less");
        config.paths.css = root.join("web/css");
        config.root = root;

        crate::utils::log::route_to_stderr();
        let mut log = CompileLog::default();
        let summary = compile_all(&config, &mut log).unwrap();

        let mut out = Vec::new();
        PassReport {
            summary: Some(summary),
            log: &log,
        }
        .write_to(&mut out)
        .unwrap();

        // The whole buffer is one JSON document
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["summary"]["compiled"], 0);
        assert!(out.ends_with(b"}\n"));
    }
}
