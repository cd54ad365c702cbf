//! Line-oriented text report of a populated store
//!
//! Hotels appear in id order, each followed by its reviews, newest first.
//! When a run summary is attached, every recoverable issue is listed at the
//! end so partial ingestion is visible in the report itself.

use crate::ingest::IngestSummary;
use crate::model::{Hotel, Review};
use crate::store::HotelStore;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const HOTEL_RULE: &str = "********************";
const REVIEW_RULE: &str = "--------------------";
const SUMMARY_RULE: &str = "====================";

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Renders a store, and optionally a run summary, as text.
///
/// Only call this once every merge has finished; the orchestrator does so
/// after the completion barrier reaches zero.
pub struct ReportWriter<'a> {
    store: &'a HotelStore,
    summary: Option<&'a IngestSummary>,
}

impl<'a> ReportWriter<'a> {
    pub fn new(store: &'a HotelStore) -> Self {
        Self {
            store,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: &'a IngestSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Write the report to `out`
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (hotel, reviews) in self.store.snapshot() {
            write_hotel(out, &hotel, &reviews)?;
        }
        if let Some(summary) = self.summary {
            write_summary(out, summary)?;
        }
        Ok(())
    }

    /// Create or truncate `path` and write the report into it
    pub fn write_to_path(&self, path: &Path) -> Result<(), ReportError> {
        let to_error = |source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut out = BufWriter::new(File::create(path).map_err(to_error)?);
        self.write(&mut out).map_err(to_error)?;
        out.flush().map_err(to_error)
    }

    /// The report as a string
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn write_hotel<W: Write>(out: &mut W, hotel: &Hotel, reviews: &[Review]) -> io::Result<()> {
    writeln!(out, "{}", HOTEL_RULE)?;
    writeln!(out, "{}: {}", hotel.name, hotel.id)?;
    writeln!(out, "{}", hotel.address)?;
    writeln!(out, "{}", hotel.city)?;
    writeln!(out, "Price code: {}", hotel.price_code)?;
    writeln!(out, "Location: {}, {}", hotel.latitude, hotel.longitude)?;
    match hotel.average_rating {
        Some(average) => writeln!(out, "Average rating: {:.2} ({} reviews)", average, reviews.len())?,
        None => writeln!(out, "Average rating: none (0 reviews)")?,
    }

    for review in reviews {
        writeln!(out, "{}", REVIEW_RULE)?;
        writeln!(out, "Review by {} on {}", review.author, review.date)?;
        writeln!(out, "Rating: {}", review.rating)?;
        writeln!(out, "Recommended: {}", if review.recommended { "yes" } else { "no" })?;
        writeln!(out, "ReviewId: {}", review.review_id)?;
        writeln!(out, "{}", review.title)?;
        writeln!(out, "{}", review.text)?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, summary: &IngestSummary) -> io::Result<()> {
    writeln!(out, "{}", SUMMARY_RULE)?;
    writeln!(out, "Ingestion run {}", summary.run_id)?;
    writeln!(out, "Started: {}", summary.started_at.to_rfc3339())?;
    writeln!(out, "Finished: {}", summary.finished_at.to_rfc3339())?;
    writeln!(out, "Hotels loaded: {}", summary.hotels_loaded)?;
    writeln!(
        out,
        "Review files: {} dispatched, {} failed",
        summary.files_dispatched, summary.files_failed
    )?;
    writeln!(
        out,
        "Reviews: {} merged, {} rejected, {} dropped",
        summary.reviews_merged, summary.reviews_rejected, summary.reviews_dropped
    )?;
    writeln!(out, "Issues: {}", summary.issues.len())?;
    for issue in &summary.issues {
        writeln!(out, "{}", issue)?;
    }
    Ok(())
}
