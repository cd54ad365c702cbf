//! Shared fixtures for ingestion integration tests
//!
//! Builds a hotel metadata file and a review tree inside a temporary
//! directory.

#![allow(dead_code)]

use hotel_ingest::IngestConfig;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary input tree: `hotels.json` plus a `reviews/` directory
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("reviews")).expect("create reviews dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn hotels_path(&self) -> PathBuf {
        self.root().join("hotels.json")
    }

    pub fn reviews_dir(&self) -> PathBuf {
        self.root().join("reviews")
    }

    pub fn output_path(&self) -> PathBuf {
        self.root().join("report.txt")
    }

    /// Write a metadata document listing the given hotel ids
    pub fn write_hotels(&self, ids: &[&str]) {
        let records: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "f": format!("Hotel {}", id),
                    "ci": "San Francisco",
                    "pr": "CA",
                    "ad": "100 Market St",
                    "ll": {"lat": "37.7749", "lng": "-122.4194"}
                })
            })
            .collect();
        fs::write(self.hotels_path(), json!({ "sr": records }).to_string()).expect("write hotels");
    }

    /// Write a review document at `relative` (under `reviews/`), creating parents
    pub fn write_reviews(&self, relative: &str, records: Vec<Value>) -> PathBuf {
        let doc = json!({"reviewDetails": {"reviewCollection": {"review": records}}});
        self.write_raw(relative, &serde_json::to_string_pretty(&doc).unwrap())
    }

    /// Write arbitrary content at `relative` (under `reviews/`)
    pub fn write_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.reviews_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create review subdir");
        }
        fs::write(&path, content).expect("write review file");
        path
    }

    pub fn config(&self) -> IngestConfig {
        IngestConfig::new(self.hotels_path(), self.reviews_dir())
            .with_workers(4)
            .with_output(self.output_path())
    }
}

/// One review record in source-document form
pub fn review(hotel: &str, id: &str, rating: Value) -> Value {
    json!({
        "hotelId": hotel,
        "reviewId": id,
        "ratingOverall": rating,
        "title": format!("Stay {}", id),
        "reviewText": "Comfortable beds and friendly staff.",
        "isRecommended": "YES",
        "reviewSubmissionTime": "2016-06-29T16:00:00Z",
        "userNickname": format!("guest-{}", id)
    })
}
