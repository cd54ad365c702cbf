//! Parse-and-merge unit: the body of one submitted job

use super::issues::IngestIssue;
use crate::parse::parse_review_file;
use crate::store::HotelStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// What one unit did with its file
#[derive(Debug, Clone, Default)]
pub struct UnitReport {
    pub path: PathBuf,
    /// The file could not be read or parsed at all
    pub failed: bool,
    /// Reviews attached to a hotel
    pub merged: usize,
    /// Records skipped as malformed
    pub rejected: usize,
    /// Reviews dropped for naming an unknown hotel
    pub dropped: usize,
    pub issues: Vec<IngestIssue>,
}

impl UnitReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    fn record(&mut self, issue: IngestIssue) {
        self.issues.push(issue.logged());
    }
}

/// Parses one review file and merges it into the shared store
#[derive(Debug)]
pub struct ReviewUnit {
    path: PathBuf,
    store: Arc<HotelStore>,
}

impl ReviewUnit {
    pub fn new(path: impl Into<PathBuf>, store: Arc<HotelStore>) -> Self {
        Self {
            path: path.into(),
            store,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file into a local aggregate and merge it.
    ///
    /// Never fails: every problem ends up in the returned report. Barrier
    /// release is the caller's job and must follow this call on every path.
    pub fn run(&self) -> UnitReport {
        let mut report = UnitReport::new(&self.path);

        let parsed = match parse_review_file(&self.path) {
            Ok(parsed) => parsed,
            Err(e) => {
                report.failed = true;
                report.record(IngestIssue::from_parse_error(&e));
                return report;
            }
        };

        report.rejected = parsed.rejected.len();
        for rejected in &parsed.rejected {
            report.record(IngestIssue::malformed_record(&self.path, rejected));
        }

        let outcome = self.store.merge_reviews(&parsed.aggregate);
        report.merged = outcome.merged;
        report.dropped = outcome.dropped.len();
        for review in &outcome.dropped {
            report.record(IngestIssue::unknown_hotel(&self.path, review));
        }

        debug!(
            "Merged {} reviews from {} ({} rejected, {} dropped)",
            report.merged,
            self.path.display(),
            report.rejected,
            report.dropped
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::issues::IssueKind;
    use crate::model::{Hotel, HotelId};
    use serde_json::json;

    fn store_with(ids: &[&str]) -> Arc<HotelStore> {
        let store = Arc::new(HotelStore::new());
        for id in ids {
            store.add_hotel(Hotel::new(*id, format!("Hotel {}", id))).unwrap();
        }
        store
    }

    fn write_reviews(dir: &Path, name: &str, records: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        let doc = json!({"reviewDetails": {"reviewCollection": {"review": records}}});
        std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        path
    }

    fn record(hotel: &str, id: &str, rating: serde_json::Value) -> serde_json::Value {
        json!({
            "hotelId": hotel, "reviewId": id, "ratingOverall": rating,
            "title": "t", "reviewText": "x", "isRecommended": "YES",
            "reviewSubmissionTime": "2016-01-01T00:00:00Z", "userNickname": "u"
        })
    }

    #[test]
    fn merges_valid_reviews() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["h1"]);
        let path = write_reviews(
            dir.path(),
            "r.json",
            json!([record("h1", "r1", json!(5)), record("h1", "r2", json!(3))]),
        );

        let report = ReviewUnit::new(&path, Arc::clone(&store)).run();
        assert!(!report.failed);
        assert_eq!(report.merged, 2);
        assert!(report.issues.is_empty());
        assert_eq!(store.hotel(&HotelId::from("h1")).unwrap().average_rating, Some(4.0));
    }

    #[test]
    fn collects_record_and_referential_issues() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&["h1"]);
        let path = write_reviews(
            dir.path(),
            "r.json",
            json!([
                record("h1", "r1", json!(4)),
                record("h1", "r2", json!("n/a")),
                record("nowhere", "r3", json!(2))
            ]),
        );

        let report = ReviewUnit::new(&path, Arc::clone(&store)).run();
        assert_eq!(report.merged, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.dropped, 1);
        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::MalformedRecord, IssueKind::UnknownHotel]);
        assert_eq!(store.review_count(), 1);
    }

    #[test]
    fn unreadable_document_fails_the_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[[[").unwrap();

        let report = ReviewUnit::new(&path, store_with(&[])).run();
        assert!(report.failed);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::MalformedDocument);

        let missing = ReviewUnit::new(dir.path().join("gone.json"), store_with(&[])).run();
        assert!(missing.failed);
        assert_eq!(missing.issues[0].kind, IssueKind::NotFound);
    }
}
