//! File system watcher for continuous compilation.
//!
//! Monitors the document root for stylesheet changes and reruns the
//! compilation pass. Every pass starts from a fresh [`CompileLog`], so a
//! long session never accumulates records.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      Event Loop                        │
//! │                                                        │
//! │  ┌──────────┐    ┌──────────┐    ┌──────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│ handle_changes() │  │
//! │  │ events   │    │ (300ms)  │    │   compile_all()  │  │
//! │  └──────────┘    └──────────┘    └──────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes under the CSS root are ignored so that a pass never triggers
//! itself.

use crate::{build::compile_all, compiler::CompileLog, config::LessConfig, log, utils::rel_path};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, RecvTimeoutError},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

/// Extensions that can take part in an import chain
const STYLESHEET_EXTENSIONS: &[&str] = &["less", "lss", "css"];

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Check if a changed path can affect any artifact.
fn is_watched_stylesheet(path: &Path, css_root: &Path) -> bool {
    let is_stylesheet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext));

    is_stylesheet && !is_temp_file(path) && !path.starts_with(css_root)
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    /// Queue the event's paths accepted by `keep`.
    fn add(&mut self, event: Event, keep: impl Fn(&Path) -> bool) {
        let before = self.pending.len();
        self.pending
            .extend(event.paths.into_iter().filter(|path| keep(path)));
        if self.pending.len() > before {
            self.last_event = Some(Instant::now());
        }
    }

    /// A batch is due once events have gone quiet and the last rebuild has
    /// cooled down. Changes saved during the cooldown wait in `pending`.
    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && !self.in_cooldown()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Rerun the pass for a batch of changes, logging failures.
fn handle_changes(paths: &[PathBuf], config: &LessConfig) {
    let changed: Vec<_> = paths.iter().map(|p| rel_path(p, &config.root)).collect();
    log!("watch"; "{} changed", changed.join(", "));

    let mut log = CompileLog::default();
    if let Err(e) = compile_all(config, &mut log) {
        log!("watch"; "compile failed ({})", changed.join(", "));
        log!("error"; "{e:#}");
    }
    eprintln!(); // Blank line to separate passes
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Watch the document root and recompile on changes. Blocks until the
/// watcher channel closes.
pub fn watch_for_changes_blocking(config: &LessConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;

    let web = config.web_dir();
    watcher
        .watch(web, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", web.display()))?;
    log!("watch"; "watching {}/ (ctrl-c to stop)", rel_path(web, &config.root));
    eprintln!(); // Blank line to separate init logs from change events

    let css_root = config.css_dir();
    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => {
                debouncer.add(event, |path| is_watched_stylesheet(path, css_root));
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                handle_changes(&debouncer.take(), config);
                debouncer.mark_rebuild();
            }
            Err(RecvTimeoutError::Disconnected) => break,
            // Irrelevant events, timeout before the batch is due
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventKind};

    fn event(paths: &[&str]) -> Event {
        let mut event = Event::new(EventKind::Create(CreateKind::File));
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("/web/less/main.less~")));
        assert!(is_temp_file(Path::new("/web/less/.main.less.swp")));
        assert!(is_temp_file(Path::new("/web/less/main.bak")));
        assert!(!is_temp_file(Path::new("/web/less/main.less")));
    }

    #[test]
    fn test_is_watched_stylesheet() {
        let css = Path::new("/web/css");
        assert!(is_watched_stylesheet(Path::new("/web/less/main.less"), css));
        assert!(is_watched_stylesheet(Path::new("/web/less/old.lss"), css));
        assert!(is_watched_stylesheet(Path::new("/web/vendor/reset.css"), css));
        // Our own output
        assert!(!is_watched_stylesheet(Path::new("/web/css/main.css"), css));
        assert!(!is_watched_stylesheet(Path::new("/web/js/app.js"), css));
        assert!(!is_watched_stylesheet(Path::new("/web/less/.main.less"), css));
    }

    #[test]
    fn test_debouncer_filters_and_dedups() {
        let mut debouncer = Debouncer::new();
        let css = Path::new("/web/css");

        debouncer.add(
            event(&["/web/less/b.less", "/web/css/b.css", "/web/less/a.less"]),
            |p| is_watched_stylesheet(p, css),
        );
        debouncer.add(event(&["/web/less/a.less"]), |p| is_watched_stylesheet(p, css));

        assert_eq!(
            debouncer.take(),
            vec![PathBuf::from("/web/less/a.less"), PathBuf::from("/web/less/b.less")]
        );
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_ignores_filtered_only_events() {
        let mut debouncer = Debouncer::new();
        debouncer.add(event(&["/web/css/main.css"]), |_| false);

        assert!(debouncer.last_event.is_none());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_debouncer_ready_after_quiet_period() {
        let mut debouncer = Debouncer::new();
        debouncer.add(event(&["/web/less/main.less"]), |_| true);
        assert!(!debouncer.ready());

        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS));
        assert!(debouncer.ready());
    }

    #[test]
    fn test_debouncer_cooldown() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.in_cooldown());
        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
    }

    #[test]
    fn test_debouncer_keeps_changes_saved_during_cooldown() {
        let mut debouncer = Debouncer::new();
        debouncer.mark_rebuild();
        debouncer.add(event(&["/web/less/main.less"]), |_| true);

        // Quiet long enough, but still cooling down from the last rebuild
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS));
        assert!(debouncer.in_cooldown());
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));

        debouncer.last_rebuild = Some(Instant::now() - Duration::from_millis(REBUILD_COOLDOWN_MS));
        assert!(debouncer.ready());
        assert_eq!(debouncer.take(), vec![PathBuf::from("/web/less/main.less")]);
    }
}
