//! Recompilation decisions based on modification times.
//!
//! An artifact is stale when it is missing, or when the entry or any of its
//! dependencies was modified after it. Date checking can be switched off
//! entirely, in which case every artifact is stale and the dependency graph
//! is never walked.

use crate::config::CompileConfig;
use crate::deps::{DependencyGraph, DependencySet};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Why an artifact must be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The artifact does not exist yet
    Missing,
    /// Date checking is disabled
    Unchecked,
    /// The entry or a dependency is newer than the artifact
    Outdated,
}

impl StaleReason {
    /// Short description for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "new",
            Self::Unchecked => "forced",
            Self::Outdated => "changed",
        }
    }
}

/// Outcome of a staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    Fresh,
    Stale(StaleReason),
    /// A timestamp could not be read; the entry is skipped for this pass.
    CheckFailed(String),
}

/// Compares entry and dependency mtimes against the artifact's.
#[derive(Debug, Clone, Copy)]
pub struct StalenessOracle {
    check_dates: bool,
    check_dependencies: bool,
}

impl StalenessOracle {
    pub const fn new(check_dates: bool, check_dependencies: bool) -> Self {
        Self {
            check_dates,
            check_dependencies,
        }
    }

    pub const fn from_config(config: &CompileConfig) -> Self {
        Self::new(config.check_dates, config.check_dependencies)
    }

    /// Decide whether `artifact` must be rebuilt from `entry`, walking
    /// `graph` for the dependencies.
    pub fn evaluate(&self, entry: &Path, artifact: &Path, graph: &DependencyGraph) -> Staleness {
        self.needs_recompile(entry, artifact, || graph.compute(entry))
    }

    /// Decide whether `artifact` must be rebuilt from `entry`.
    ///
    /// `deps` is only called when the artifact exists and both date and
    /// dependency checking are enabled.
    pub fn needs_recompile(
        &self,
        entry: &Path,
        artifact: &Path,
        deps: impl FnOnce() -> DependencySet,
    ) -> Staleness {
        let artifact_time = match fs::metadata(artifact) {
            Ok(meta) => meta.modified(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Staleness::Stale(StaleReason::Missing);
            }
            Err(e) => Err(e),
        };

        if !self.check_dates {
            return Staleness::Stale(StaleReason::Unchecked);
        }

        let artifact_time = match artifact_time {
            Ok(time) => time,
            Err(e) => return check_failed(artifact, &e),
        };

        let deps = if self.check_dependencies {
            deps()
        } else {
            DependencySet::default()
        };

        let newest = match newest_input(entry, &deps) {
            Ok(time) => time,
            Err((path, e)) => return check_failed(&path, &e),
        };

        if newest > artifact_time {
            Staleness::Stale(StaleReason::Outdated)
        } else {
            Staleness::Fresh
        }
    }
}

/// Latest mtime over the entry and its dependencies.
fn newest_input(
    entry: &Path,
    deps: &DependencySet,
) -> Result<SystemTime, (PathBuf, io::Error)> {
    let mtime = |path: &Path| {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| (path.to_path_buf(), e))
    };

    let mut newest = mtime(entry)?;
    for dep in deps.iter() {
        newest = newest.max(mtime(dep)?);
    }
    Ok(newest)
}

fn check_failed(path: &Path, err: &io::Error) -> Staleness {
    Staleness::CheckFailed(format!("cannot read mtime of `{}`: {err}", path.display()))
}
