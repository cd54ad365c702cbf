//! Orchestrator: metadata load, dispatch, wait, serialize
//!
//! The order of these steps is the only consistency guarantee a run gives:
//! hotels exist before any review merges, and the report is written only
//! after the barrier has seen every unit finish.

use super::barrier::CompletionBarrier;
use super::dispatcher::WorkDispatcher;
use super::issues::{IngestIssue, IssueKind};
use super::pool::{PoolError, WorkerPool};
use super::summary::IngestSummary;
use super::unit::UnitReport;
use crate::config::{ConfigError, IngestConfig};
use crate::parse::parse_hotels;
use crate::report::{ReportError, ReportWriter};
use crate::store::{HotelStore, StoreError};
use chrono::Utc;
use crossbeam_channel::unbounded;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, info_span};
use uuid::Uuid;

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("{outstanding} units still outstanding after waiting {waited:?}")]
    Timeout { outstanding: usize, waited: Duration },

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Result type for ingestion runs
pub type IngestResult<T> = Result<T, IngestError>;

/// Outcome of loading the metadata document
#[derive(Debug, Clone, Default)]
pub struct MetadataLoad {
    pub hotels_loaded: usize,
    pub issues: Vec<IngestIssue>,
}

/// Register every hotel from the metadata document at `path`.
///
/// Never fails; a missing or malformed document leaves the store as it was
/// and is reported as an issue.
pub fn load_hotels(store: &HotelStore, path: &Path) -> MetadataLoad {
    let mut load = MetadataLoad::default();

    let parsed = match parse_hotels(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            load.issues.push(IngestIssue::from_parse_error(&e).logged());
            return load;
        }
    };

    for rejected in &parsed.rejected {
        load.issues
            .push(IngestIssue::malformed_record(path, rejected).logged());
    }
    for hotel in parsed.hotels {
        match store.add_hotel(hotel) {
            Ok(()) => load.hotels_loaded += 1,
            Err(StoreError::DuplicateHotel(id)) => {
                load.issues
                    .push(IngestIssue::duplicate_hotel(path, &id).logged());
            }
        }
    }

    info!("Loaded {} hotels from {}", load.hotels_loaded, path.display());
    load
}

/// A finished run: its summary and the populated store
#[derive(Debug)]
pub struct IngestRun {
    pub summary: IngestSummary,
    pub store: Arc<HotelStore>,
}

/// Drives one complete ingestion run
pub struct Orchestrator {
    config: IngestConfig,
    store: Arc<HotelStore>,
    barrier: Arc<CompletionBarrier>,
}

impl Orchestrator {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            store: Arc::new(HotelStore::new()),
            barrier: CompletionBarrier::new(),
        }
    }

    /// The store units merge into; readable while a run is in progress
    pub fn store(&self) -> Arc<HotelStore> {
        Arc::clone(&self.store)
    }

    /// Run the whole pipeline once.
    ///
    /// Only configuration problems, pool start-up failures, a bounded wait
    /// running out and report write failures are errors. Everything else is
    /// collected into the summary.
    pub fn run(self) -> IngestResult<IngestRun> {
        self.config.validate()?;

        let run_id = Uuid::new_v4();
        let span = info_span!("ingest", %run_id);
        let _entered = span.enter();
        let mut summary = IngestSummary::new(run_id, Utc::now());

        let metadata = load_hotels(&self.store, &self.config.hotels);
        summary.hotels_loaded = metadata.hotels_loaded;
        summary.issues.extend(metadata.issues);

        let pool = WorkerPool::new(self.config.workers)?;
        info!("Ingesting reviews with {} workers", pool.size());

        let (reports_tx, reports_rx) = unbounded::<UnitReport>();
        let dispatch = WorkDispatcher::new(
            &pool,
            Arc::clone(&self.barrier),
            Arc::clone(&self.store),
            reports_tx,
        )
        .with_suffix(self.config.suffix.clone())
        .follow_links(self.config.follow_links)
        .dispatch(&self.config.reviews);
        summary.files_dispatched = dispatch.submitted;
        summary.issues.extend(dispatch.issues);

        self.wait_for_units()?;
        pool.shutdown();

        let mut reported = 0usize;
        for report in reports_rx.try_iter() {
            reported += 1;
            if report.failed {
                summary.files_failed += 1;
            }
            summary.reviews_merged += report.merged;
            summary.reviews_rejected += report.rejected;
            summary.reviews_dropped += report.dropped;
            summary.issues.extend(report.issues);
        }

        let missing = summary.files_dispatched.saturating_sub(reported);
        if missing > 0 {
            summary.files_failed += missing;
            summary.issues.push(
                IngestIssue::new(
                    IssueKind::Aborted,
                    None,
                    format!("{} units finished without reporting back", missing),
                )
                .logged(),
            );
        }

        summary.units_released = self.barrier.stats().released;
        summary.issues.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.detail.cmp(&b.detail))
        });
        summary.finished_at = Utc::now();

        info!(
            "Merged {} reviews into {} hotels from {} files ({} issues)",
            summary.reviews_merged,
            summary.hotels_loaded,
            summary.files_dispatched,
            summary.issues.len()
        );

        if let Some(output) = &self.config.output {
            ReportWriter::new(&self.store)
                .with_summary(&summary)
                .write_to_path(output)?;
            info!("Wrote report to {}", output.display());
        }

        Ok(IngestRun {
            summary,
            store: self.store,
        })
    }

    fn wait_for_units(&self) -> IngestResult<()> {
        match self.config.wait_timeout() {
            None => {
                self.barrier.await_zero();
                Ok(())
            }
            Some(waited) => {
                if self.barrier.await_zero_timeout(waited) {
                    Ok(())
                } else {
                    Err(IngestError::Timeout {
                        outstanding: self.barrier.outstanding(),
                        waited,
                    })
                }
            }
        }
    }
}
