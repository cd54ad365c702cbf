//! Recoverable ingestion problems
//!
//! Nothing in this module aborts a run. Each problem becomes an
//! `IngestIssue` that is logged where it is detected and collected into the
//! run summary, so partial ingestion always shows up in the final report.

use crate::model::{HotelId, Review};
use crate::parse::{ParseError, RejectedRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Category of a recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Metadata or review file does not exist
    NotFound,
    /// File content is not a usable document; it contributes nothing
    MalformedDocument,
    /// One record inside an otherwise valid document was skipped
    MalformedRecord,
    /// Review names a hotel that was never registered; review dropped
    UnknownHotel,
    /// Metadata lists the same hotel id more than once; later entry ignored
    DuplicateHotel,
    /// Any other read failure, including unreadable directories
    Io,
    /// The pool refused a unit
    Submission,
    /// A unit stopped without reporting back
    Aborted,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::NotFound => "not-found",
            IssueKind::MalformedDocument => "malformed-document",
            IssueKind::MalformedRecord => "malformed-record",
            IssueKind::UnknownHotel => "unknown-hotel",
            IssueKind::DuplicateHotel => "duplicate-hotel",
            IssueKind::Io => "io",
            IssueKind::Submission => "submission",
            IssueKind::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recoverable problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestIssue {
    pub kind: IssueKind,
    /// File or directory the problem belongs to, when known
    pub path: Option<PathBuf>,
    pub detail: String,
}

impl IngestIssue {
    pub fn new(kind: IssueKind, path: Option<&Path>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.map(Path::to_path_buf),
            detail: detail.into(),
        }
    }

    pub fn from_parse_error(error: &ParseError) -> Self {
        let kind = match error {
            ParseError::NotFound { .. } => IssueKind::NotFound,
            ParseError::Io { .. } => IssueKind::Io,
            ParseError::Json { .. } | ParseError::Structure { .. } => IssueKind::MalformedDocument,
        };
        Self::new(kind, Some(error.path()), error.to_string())
    }

    pub fn malformed_record(path: &Path, rejected: &RejectedRecord) -> Self {
        Self::new(
            IssueKind::MalformedRecord,
            Some(path),
            format!("record {}: {}", rejected.index, rejected.error),
        )
    }

    pub fn unknown_hotel(path: &Path, review: &Review) -> Self {
        Self::new(
            IssueKind::UnknownHotel,
            Some(path),
            format!(
                "review {} names unknown hotel {}",
                review.review_id, review.hotel_id
            ),
        )
    }

    pub fn duplicate_hotel(path: &Path, id: &HotelId) -> Self {
        Self::new(
            IssueKind::DuplicateHotel,
            Some(path),
            format!("hotel {} is already registered", id),
        )
    }

    /// Log the issue at warn level and hand it back
    pub fn logged(self) -> Self {
        match &self.path {
            Some(path) => warn!("[{}] {}: {}", self.kind, path.display(), self.detail),
            None => warn!("[{}] {}", self.kind, self.detail),
        }
        self
    }
}

impl std::fmt::Display for IngestIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.kind, path.display(), self.detail),
            None => write!(f, "[{}] {}", self.kind, self.detail),
        }
    }
}
