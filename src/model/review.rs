//! Review: an immutable rating of one hotel by one author

use super::hotel::HotelId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors produced when interpreting a rating value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating '{0}' is not an integer")]
    NotNumeric(String),

    #[error("rating {0} is outside {min}..={max}", min = Rating::MIN, max = Rating::MAX)]
    OutOfRange(i64),
}

/// An overall rating in `Rating::MIN..=Rating::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Build a rating, rejecting values outside the allowed range
    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    /// Parse a rating from its textual form.
    ///
    /// The text must be an integer as written; `"4.0"` and `" 4"` are rejected.
    pub fn parse(text: &str) -> Result<Self, RatingError> {
        let value: i64 = text
            .parse()
            .map_err(|_| RatingError::NotNumeric(text.to_string()))?;
        Self::new(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.0 as i64
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single review attached to a hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Identifier, unique within the owning hotel
    pub review_id: String,
    /// Owning hotel; must reference a registered hotel to be merged
    pub hotel_id: HotelId,
    pub rating: Rating,
    pub title: String,
    pub text: String,
    pub recommended: bool,
    /// Submission date, kept exactly as written in the source document
    pub date: String,
    pub author: String,
}

impl Review {
    /// Interpret a recommendation flag.
    ///
    /// Only an explicit `NO` (any case) is negative; every other value is
    /// treated as a recommendation.
    pub fn parse_recommendation(value: &str) -> bool {
        !value.eq_ignore_ascii_case("no")
    }

    /// Order used when listing a hotel's reviews: most recent first, then by id.
    pub fn display_order(a: &Review, b: &Review) -> Ordering {
        b.date
            .cmp(&a.date)
            .then_with(|| a.review_id.cmp(&b.review_id))
            .then_with(|| a.author.cmp(&b.author))
    }
}
