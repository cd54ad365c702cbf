//! Hotel review ingestion
//!
//! Loads a hotel metadata document, then walks a directory tree of review
//! documents and merges them concurrently into one shared store.
//!
//! # Core Concepts
//!
//! - **HotelStore**: the shared aggregate every unit merges into; keeps each
//!   hotel's average rating consistent with its attached reviews
//! - **ReviewUnit**: parses one review file into a private aggregate and
//!   merges it
//! - **CompletionBarrier**: counts outstanding units so the orchestrator can
//!   wait for all of them before writing the report
//!
//! # Example
//!
//! ```no_run
//! use hotel_ingest::{IngestConfig, Orchestrator};
//!
//! let config = IngestConfig::new("input/hotels.json", "input/reviews")
//!     .with_output("output/hotels.txt");
//! let run = Orchestrator::new(config).run()?;
//! println!("{} reviews merged", run.summary.reviews_merged);
//! # Ok::<(), hotel_ingest::IngestError>(())
//! ```

pub mod config;
pub mod ingest;
mod model;
pub mod parse;
pub mod report;
pub mod store;

pub use config::{ConfigError, IngestConfig};
pub use ingest::{
    CompletionBarrier, IngestError, IngestIssue, IngestResult, IngestRun, IngestSummary, IssueKind,
    Orchestrator, WorkerPool,
};
pub use model::{Hotel, HotelId, Rating, RatingError, Review};
pub use report::{ReportError, ReportWriter};
pub use store::{HotelStore, HotelSummary, LocalAggregate, MergeOutcome, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
