//! Per-pass compilation records.
//!
//! A [`CompileLog`] belongs to exactly one pass. Every pass starts from
//! `CompileLog::default()`, so long-running watch sessions do not accumulate
//! records.

use serde::{Serialize, Serializer};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

/// One attempted compilation. Skipped (fresh) entries are not recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationRecord {
    pub source: PathBuf,
    pub artifact: PathBuf,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub succeeded: bool,
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
}

/// Records and compiler errors collected during one pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileLog {
    records: Vec<CompilationRecord>,
    /// Last error message per source
    errors: BTreeMap<PathBuf, String>,
}

impl CompileLog {
    pub fn record(&mut self, record: CompilationRecord) {
        self.records.push(record);
    }

    /// Store the error for `source`, replacing any earlier one.
    pub fn record_error(&mut self, source: &Path, message: String) {
        self.errors.insert(source.to_path_buf(), message);
    }

    /// Records in the order they were attempted.
    pub fn records(&self) -> &[CompilationRecord] {
        &self.records
    }

    pub fn errors(&self) -> &BTreeMap<PathBuf, String> {
        &self.errors
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.records.iter().map(|r| r.elapsed).sum()
    }
}
