//! Work dispatcher: walks the review tree and fans units out to the pool

use super::barrier::CompletionBarrier;
use super::issues::{IngestIssue, IssueKind};
use super::pool::WorkerPool;
use super::unit::{ReviewUnit, UnitReport};
use crate::store::HotelStore;
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Default suffix for review documents
pub const DEFAULT_SUFFIX: &str = ".json";

/// Counts from one dispatch pass
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    /// Units handed to the pool
    pub submitted: usize,
    /// Plain files that did not match the suffix
    pub skipped: usize,
    /// Walk and submission problems
    pub issues: Vec<IngestIssue>,
}

/// Discovers review files and submits one unit per file.
///
/// Every submission is preceded by a barrier acquire. The permit travels
/// inside the job and is dropped after the unit's report has been sent, so
/// a waiter on the barrier always sees every report.
pub struct WorkDispatcher<'a> {
    pool: &'a WorkerPool,
    barrier: Arc<CompletionBarrier>,
    store: Arc<HotelStore>,
    reports: Sender<UnitReport>,
    suffix: String,
    follow_links: bool,
}

impl<'a> WorkDispatcher<'a> {
    pub fn new(
        pool: &'a WorkerPool,
        barrier: Arc<CompletionBarrier>,
        store: Arc<HotelStore>,
        reports: Sender<UnitReport>,
    ) -> Self {
        Self {
            pool,
            barrier,
            store,
            reports,
            suffix: DEFAULT_SUFFIX.to_string(),
            follow_links: false,
        }
    }

    /// Only files whose name ends with `suffix` become units
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    fn is_eligible(&self, entry: &DirEntry) -> bool {
        // Byte comparison so names that are not valid UTF-8 still match.
        entry.file_type().is_file()
            && entry
                .file_name()
                .as_encoded_bytes()
                .ends_with(self.suffix.as_bytes())
    }

    /// Walk `root` recursively and submit every eligible file.
    ///
    /// Does not wait for the units. An unreadable directory is recorded and
    /// its siblings are still walked.
    pub fn dispatch(&self, root: &Path) -> DispatchStats {
        let mut stats = DispatchStats::default();

        for entry in WalkDir::new(root).follow_links(self.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf);
                    stats.issues.push(
                        IngestIssue::new(IssueKind::Io, path.as_deref(), e.to_string()).logged(),
                    );
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            if !self.is_eligible(&entry) {
                stats.skipped += 1;
                continue;
            }

            match self.submit(entry.path()) {
                Ok(()) => stats.submitted += 1,
                Err(issue) => stats.issues.push(issue),
            }
        }

        info!(
            "Dispatched {} review files from {} ({} skipped, {} walk issues)",
            stats.submitted,
            root.display(),
            stats.skipped,
            stats.issues.len()
        );
        stats
    }

    fn submit(&self, path: &Path) -> Result<(), IngestIssue> {
        let permit = self.barrier.acquire();
        let unit = ReviewUnit::new(path, Arc::clone(&self.store));
        let reports = self.reports.clone();

        debug!("Submitting {}", path.display());
        self.pool
            .submit(move || {
                let _permit = permit;
                let report = unit.run();
                // The receiver outlives the barrier wait; a send error only
                // means nobody is collecting reports any more.
                let _ = reports.send(report);
            })
            .map_err(|e| IngestIssue::new(IssueKind::Submission, Some(path), e.to_string()).logged())
    }
}
