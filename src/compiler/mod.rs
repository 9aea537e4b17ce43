//! Stale stylesheet compilation.
//!
//! This module drives one pass over the entry stylesheets:
//!
//! - **staleness**: Decide whether an artifact is out of date
//! - **lessc**: The external compiler behind [`StyleCompiler`]
//! - **artifact**: Artifact paths, header stamp and permissions
//! - **report**: Per-pass records and errors
//!
//! # Pass Flow
//!
//! ```text
//! entry.less ──► artifact_path_for() ──► StalenessOracle ──► compile_one()
//!                                              │                  │
//!                                              ▼                  ▼
//!                                        Fresh / skipped    CompileLog record
//! ```
//!
//! Entries are processed one at a time, in the order given.

pub mod artifact;
mod lessc;
mod report;
mod staleness;

pub use lessc::{Lessc, StyleCompiler};
pub use report::{CompilationRecord, CompileLog};
pub use staleness::{Staleness, StalenessOracle};

use crate::{
    config::LessConfig,
    deps::{DependencyError, DependencyGraph},
    log,
    utils::{minify::minify_css, rel_path},
};
use serde::Serialize;
use std::{
    io,
    path::{Path, PathBuf},
    time::Instant,
};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler rejected a stylesheet
    #[error("LESS parser error in \"{}\":\n\n{output}", entry.display())]
    Compiler { entry: PathBuf, output: String },

    /// The artifact or its directory could not be written
    #[error("cannot write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// Pass Results
// ============================================================================

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Compiled,
    Failed,
    /// Artifact is up to date
    Fresh,
    /// Staleness could not be decided, or the entry has no artifact location
    Skipped,
}

/// Entry counts for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub compiled: usize,
    pub failed: usize,
    pub fresh: usize,
    pub skipped: usize,
}

impl PassSummary {
    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Compiled => self.compiled += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Fresh => self.fresh += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Compiles stale entries with an injected [`StyleCompiler`].
pub struct Orchestrator<'a> {
    config: &'a LessConfig,
    compiler: &'a dyn StyleCompiler,
    graph: DependencyGraph,
    oracle: StalenessOracle,
}

impl<'a> Orchestrator<'a> {
    /// # Errors
    /// Fails if the document root is not an existing absolute directory.
    pub fn new(
        config: &'a LessConfig,
        compiler: &'a dyn StyleCompiler,
    ) -> Result<Self, DependencyError> {
        Ok(Self {
            config,
            compiler,
            graph: DependencyGraph::new(config.web_dir())?,
            oracle: StalenessOracle::from_config(&config.compile),
        })
    }

    /// Process every entry in order.
    ///
    /// # Errors
    /// In strict mode, stops at the first failed compilation. The failure is
    /// already recorded in `log` when this returns.
    pub fn process_all<P: AsRef<Path>>(
        &self,
        entries: &[P],
        log: &mut CompileLog,
    ) -> Result<PassSummary, CompileError> {
        let mut summary = PassSummary::default();
        for entry in entries {
            summary.count(self.process(entry.as_ref(), log)?);
        }
        Ok(summary)
    }

    /// Check one entry and compile it if stale.
    pub fn process(&self, entry: &Path, log: &mut CompileLog) -> Result<Outcome, CompileError> {
        let display = rel_path(entry, &self.config.root);

        let Some(artifact) =
            artifact::artifact_path_for(entry, self.config.less_dir(), self.config.css_dir())
        else {
            log!("skip"; "{display}: outside of the LESS directory");
            return Ok(Outcome::Skipped);
        };

        let reason = match self.oracle.evaluate(entry, &artifact, &self.graph) {
            Staleness::Fresh => return Ok(Outcome::Fresh),
            Staleness::CheckFailed(reason) => {
                log!("skip"; "{display}: {reason}");
                return Ok(Outcome::Skipped);
            }
            Staleness::Stale(reason) => reason,
        };

        let start = Instant::now();
        let result = self.compile_one(entry, &artifact);
        let elapsed = start.elapsed();

        log.record(CompilationRecord {
            source: entry.to_path_buf(),
            artifact: artifact.clone(),
            elapsed,
            succeeded: result.is_ok(),
        });

        match result {
            Ok(()) => {
                log!("compile"; "{display} ({}, {:.0?})", reason.as_str(), elapsed);
                Ok(Outcome::Compiled)
            }
            Err(err) => {
                log.record_error(entry, err.to_string());
                if self.config.compile.strict {
                    return Err(err);
                }
                log!("error"; "{err}");
                Ok(Outcome::Failed)
            }
        }
    }

    /// Compile `entry` into `artifact` unconditionally.
    ///
    /// Creates the artifact directory if needed, runs the compiler, applies
    /// compression when enabled and writes the stamped result.
    pub fn compile_one(&self, entry: &Path, artifact: &Path) -> Result<(), CompileError> {
        artifact::ensure_parent_dir(artifact).map_err(CompileError::io(artifact))?;

        // The compiler may create the artifact itself
        let fresh = !artifact.exists();

        let css = self
            .compiler
            .compile_file(entry, artifact)
            .map_err(|failure| CompileError::Compiler {
                entry: entry.to_path_buf(),
                output: failure.message,
            })?;

        let css = minify_css(&css, self.config.compile.compression);
        artifact::write_artifact(artifact, &css, fresh).map_err(CompileError::io(artifact))
    }
}

// ============================================================================
// Tests
// ============================================================================
