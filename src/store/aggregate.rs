//! LocalAggregate: task-private reviews parsed from one file

use crate::model::Review;
use std::path::{Path, PathBuf};

/// Reviews parsed by a single unit before they are merged.
///
/// Owned by exactly one task. It carries no hotel metadata; referential
/// checks happen when the store merges it.
#[derive(Debug, Clone, Default)]
pub struct LocalAggregate {
    source: PathBuf,
    reviews: Vec<Review>,
}

impl LocalAggregate {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            reviews: Vec::new(),
        }
    }

    /// File the reviews were parsed from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn push(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

impl Extend<Review> for LocalAggregate {
    fn extend<T: IntoIterator<Item = Review>>(&mut self, iter: T) {
        self.reviews.extend(iter);
    }
}
