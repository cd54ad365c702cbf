//! Concurrent ingestion pipeline
//!
//! ```text
//! Orchestrator ──load──▶ HotelStore
//!      │
//!      ├─dispatch─▶ WorkDispatcher ──acquire──▶ CompletionBarrier
//!      │                 │
//!      │                 └─submit─▶ WorkerPool ──▶ ReviewUnit ──merge──▶ HotelStore
//!      │                                              │
//!      │                                              └─report, then release
//!      └─await_zero─▶ CompletionBarrier ──▶ ReportWriter
//! ```

mod barrier;
mod dispatcher;
mod issues;
mod orchestrator;
mod pool;
mod summary;
mod unit;

pub use barrier::{BarrierPermit, BarrierStats, CompletionBarrier};
pub use dispatcher::{DispatchStats, WorkDispatcher, DEFAULT_SUFFIX};
pub use issues::{IngestIssue, IssueKind};
pub use orchestrator::{load_hotels, IngestError, IngestResult, IngestRun, MetadataLoad, Orchestrator};
pub use pool::{PoolError, WorkerPool};
pub use summary::IngestSummary;
pub use unit::{ReviewUnit, UnitReport};
