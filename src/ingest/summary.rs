//! Run summary collected by the orchestrator

use super::issues::{IngestIssue, IssueKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Everything a run did, including every recoverable problem
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub hotels_loaded: usize,
    /// Review files handed to the pool
    pub files_dispatched: usize,
    /// Review files that contributed nothing because they could not be parsed
    pub files_failed: usize,
    /// Barrier releases observed; equals `files_dispatched` after a complete run
    pub units_released: u64,
    pub reviews_merged: usize,
    pub reviews_rejected: usize,
    pub reviews_dropped: usize,
    pub issues: Vec<IngestIssue>,
}

impl IngestSummary {
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: started_at,
            hotels_loaded: 0,
            files_dispatched: 0,
            files_failed: 0,
            units_released: 0,
            reviews_merged: 0,
            reviews_rejected: 0,
            reviews_dropped: 0,
            issues: Vec::new(),
        }
    }

    /// Number of issues of one kind
    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    /// True when nothing was skipped, rejected or dropped
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
