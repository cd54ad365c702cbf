//! Review document
//!
//! Layout: `{"reviewDetails": {"reviewCollection": {"review": [...]}}}`.
//! Each record carries `hotelId`, `reviewId`, `ratingOverall`, `title`,
//! `reviewText`, `isRecommended`, `reviewSubmissionTime` and `userNickname`.

use super::{read_document, scalar_text, ParseError, RecordError, RejectedRecord};
use crate::model::{HotelId, Rating, Review};
use crate::store::LocalAggregate;
use serde_json::Value;
use std::path::Path;

/// Reviews read from one file
#[derive(Debug, Clone, Default)]
pub struct ParsedReviews {
    pub aggregate: LocalAggregate,
    pub rejected: Vec<RejectedRecord>,
}

/// Parse the review file at `path` into a fresh local aggregate
pub fn parse_review_file(path: &Path) -> Result<ParsedReviews, ParseError> {
    let document = read_document(path)?;
    parse_reviews_value(path, &document)
}

/// Interpret an already-parsed review document
pub fn parse_reviews_value(path: &Path, document: &Value) -> Result<ParsedReviews, ParseError> {
    let records = document
        .pointer("/reviewDetails/reviewCollection/review")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::Structure {
            path: path.to_path_buf(),
            detail: "expected a reviewDetails.reviewCollection.review array".to_string(),
        })?;

    let mut parsed = ParsedReviews {
        aggregate: LocalAggregate::new(path),
        rejected: Vec::new(),
    };
    for (index, record) in records.iter().enumerate() {
        match parse_review(record) {
            Ok(review) => parsed.aggregate.push(review),
            Err(error) => parsed.rejected.push(RejectedRecord { index, error }),
        }
    }
    Ok(parsed)
}

fn parse_review(record: &Value) -> Result<Review, RecordError> {
    let record = record.as_object().ok_or(RecordError::NotAnObject)?;
    Ok(Review {
        hotel_id: HotelId::from(scalar_text(record, "hotelId")?),
        review_id: scalar_text(record, "reviewId")?,
        rating: Rating::parse(&scalar_text(record, "ratingOverall")?)?,
        title: scalar_text(record, "title")?,
        text: scalar_text(record, "reviewText")?,
        recommended: Review::parse_recommendation(&scalar_text(record, "isRecommended")?),
        date: scalar_text(record, "reviewSubmissionTime")?,
        author: scalar_text(record, "userNickname")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RatingError;
    use serde_json::json;

    fn record(id: &str, rating: Value) -> Value {
        json!({
            "hotelId": "h1",
            "reviewId": id,
            "ratingOverall": rating,
            "title": "Nice",
            "reviewText": "Clean rooms",
            "isRecommended": "YES",
            "reviewSubmissionTime": "2016-06-29T16:00:00Z",
            "userNickname": "traveler"
        })
    }

    fn document(records: Vec<Value>) -> Value {
        json!({"reviewDetails": {"reviewCollection": {"review": records}}})
    }

    #[test]
    fn parses_all_fields() {
        let mut rec = record("r1", json!(4));
        rec["isRecommended"] = json!("no");
        let parsed = parse_reviews_value(Path::new("r.json"), &document(vec![rec])).unwrap();

        assert!(parsed.rejected.is_empty());
        let review = &parsed.aggregate.reviews()[0];
        assert_eq!(review.hotel_id, HotelId::from("h1"));
        assert_eq!(review.review_id, "r1");
        assert_eq!(review.rating.value(), 4);
        assert_eq!(review.title, "Nice");
        assert_eq!(review.text, "Clean rooms");
        assert!(!review.recommended);
        assert_eq!(review.date, "2016-06-29T16:00:00Z");
        assert_eq!(review.author, "traveler");
        assert_eq!(parsed.aggregate.source(), Path::new("r.json"));
    }

    #[test]
    fn string_rating_is_accepted() {
        let parsed =
            parse_reviews_value(Path::new("r.json"), &document(vec![record("r1", json!("5"))])).unwrap();
        assert_eq!(parsed.aggregate.reviews()[0].rating.value(), 5);
    }

    #[test]
    fn bad_record_does_not_discard_siblings() {
        let doc = document(vec![
            record("r1", json!(4)),
            record("r2", json!("excellent")),
            record("r3", json!(2)),
        ]);
        let parsed = parse_reviews_value(Path::new("r.json"), &doc).unwrap();

        assert_eq!(parsed.aggregate.len(), 2);
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].index, 1);
        assert_eq!(
            parsed.rejected[0].error,
            RecordError::Rating(RatingError::NotNumeric("excellent".to_string()))
        );
    }

    #[test]
    fn out_of_range_and_missing_fields_are_record_errors() {
        let mut missing = record("r3", json!(3));
        missing.as_object_mut().unwrap().remove("userNickname");
        let doc = document(vec![record("r1", json!(9)), record("r2", json!(4.5)), missing]);
        let parsed = parse_reviews_value(Path::new("r.json"), &doc).unwrap();

        assert!(parsed.aggregate.is_empty());
        let errors: Vec<RecordError> = parsed.rejected.into_iter().map(|r| r.error).collect();
        assert_eq!(
            errors,
            vec![
                RecordError::Rating(RatingError::OutOfRange(9)),
                RecordError::Rating(RatingError::NotNumeric("4.5".to_string())),
                RecordError::MissingField("userNickname"),
            ]
        );
    }

    #[test]
    fn empty_review_array_yields_empty_aggregate() {
        let parsed = parse_reviews_value(Path::new("r.json"), &document(vec![])).unwrap();
        assert!(parsed.aggregate.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn wrong_structure_fails_whole_document() {
        let doc = json!({"reviewDetails": {"reviewCollection": {"review": {"not": "an array"}}}});
        let err = parse_reviews_value(Path::new("r.json"), &doc).unwrap_err();
        assert!(matches!(err, ParseError::Structure { .. }));
    }
}
