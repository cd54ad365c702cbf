//! JSON document readers for hotel metadata and review files
//!
//! Both readers separate document-level failures (`ParseError`), which
//! discard a whole file, from record-level failures (`RecordError`), which
//! discard one entry and let the rest of the file through.

mod metadata;
mod reviews;

pub use metadata::{parse_hotels, parse_hotels_value, ParsedHotels};
pub use reviews::{parse_review_file, parse_reviews_value, ParsedReviews};

use crate::model::RatingError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure that makes a whole document unusable
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected document structure in {}: {detail}", path.display())]
    Structure { path: PathBuf, detail: String },
}

impl ParseError {
    pub fn path(&self) -> &Path {
        match self {
            ParseError::NotFound { path }
            | ParseError::Io { path, .. }
            | ParseError::Json { path, .. }
            | ParseError::Structure { path, .. } => path,
        }
    }
}

/// A failure confined to one record of a document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is invalid: {detail}")]
    InvalidField { field: &'static str, detail: String },

    #[error("field 'ratingOverall': {0}")]
    Rating(#[from] RatingError),
}

/// A record that was skipped, with its position in the source array
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub error: RecordError,
}

/// Read a file into a JSON document tree
fn read_document(path: &Path) -> Result<Value, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ParseError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ParseError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Text of a required scalar field.
///
/// Strings are taken as-is; numbers and booleans use their JSON spelling.
fn scalar_text(record: &Map<String, Value>, field: &'static str) -> Result<String, RecordError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(RecordError::InvalidField {
            field,
            detail: "expected a scalar value".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_text_accepts_strings_numbers_and_bools() {
        let record = json!({"s": "abc", "n": 4, "f": 37.5, "b": false});
        let record = record.as_object().unwrap();
        assert_eq!(scalar_text(record, "s").unwrap(), "abc");
        assert_eq!(scalar_text(record, "n").unwrap(), "4");
        assert_eq!(scalar_text(record, "f").unwrap(), "37.5");
        assert_eq!(scalar_text(record, "b").unwrap(), "false");
    }

    #[test]
    fn scalar_text_rejects_missing_null_and_nested() {
        let record = json!({"null": null, "arr": [1], "obj": {}});
        let record = record.as_object().unwrap();
        assert_eq!(scalar_text(record, "absent"), Err(RecordError::MissingField("absent")));
        assert_eq!(scalar_text(record, "null"), Err(RecordError::MissingField("null")));
        assert!(matches!(
            scalar_text(record, "arr"),
            Err(RecordError::InvalidField { field: "arr", .. })
        ));
        assert!(matches!(
            scalar_text(record, "obj"),
            Err(RecordError::InvalidField { field: "obj", .. })
        ));
    }

    #[test]
    fn read_document_distinguishes_missing_from_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(read_document(&missing), Err(ParseError::NotFound { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = read_document(&broken).unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
        assert_eq!(err.path(), broken.as_path());
    }
}
