use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::shared::UsageSnapshot;

/// Everything the pipeline needs to know about directories and limits.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub sources_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub outputs_dir: PathBuf,
    pub done_dir: PathBuf,
    pub voice: String,
    pub chunk_max_chars: usize,
    pub max_segment_ms: u64,
    pub delete_intermediate: bool,
    pub synthesis_concurrency: usize,
    pub synthesis_max_attempts: u32,
    pub synthesis_retry_backoff: Duration,
}

/// What happened to one source document during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Merged, renamed and archived.
    Completed { segments: usize },
    /// Some chunks still lack artifacts; left in place for the next run.
    Incomplete { missing: usize, total: usize },
    /// Not processed: unsupported, unreadable or empty source.
    Skipped { reason: String },
    /// Merge or finalize failed; all artifacts kept on disk.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub outcome: DocumentOutcome,
}

/// End-of-run report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub usage: UsageSnapshot,
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    pub fn count(&self, predicate: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|d| predicate(&d.outcome)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Completed { .. }))
    }

    pub fn incomplete(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Incomplete { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed { .. }))
    }
}
