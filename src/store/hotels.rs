//! HotelStore: canonical hotels and their reviews

use super::aggregate::LocalAggregate;
use crate::model::{Hotel, HotelId, Review};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Hotel already registered: {0}")]
    DuplicateHotel(HotelId),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result of merging one local aggregate
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Number of reviews attached to a hotel
    pub merged: usize,
    /// Reviews naming a hotel that is not registered, in input order
    pub dropped: Vec<Review>,
}

/// Read-only view of one hotel and its review statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelSummary {
    pub hotel: Hotel,
    pub review_count: usize,
}

impl HotelSummary {
    pub fn average_rating(&self) -> Option<f64> {
        self.hotel.average_rating
    }
}

/// One hotel plus everything merged into it.
///
/// Lives inside a single map entry so the review list, the rating sum and
/// the derived average always change under the same entry lock.
#[derive(Debug, Clone)]
struct HotelEntry {
    hotel: Hotel,
    reviews: Vec<Review>,
    rating_sum: u64,
}

impl HotelEntry {
    fn new(mut hotel: Hotel) -> Self {
        hotel.average_rating = None;
        Self {
            hotel,
            reviews: Vec::new(),
            rating_sum: 0,
        }
    }

    fn absorb<'a>(&mut self, reviews: impl IntoIterator<Item = &'a Review>) -> usize {
        let before = self.reviews.len();
        for review in reviews {
            self.rating_sum += u64::from(review.rating.value());
            self.reviews.push(review.clone());
        }
        if !self.reviews.is_empty() {
            self.hotel.average_rating = Some(self.rating_sum as f64 / self.reviews.len() as f64);
        }
        self.reviews.len() - before
    }

    fn summary(&self) -> HotelSummary {
        HotelSummary {
            hotel: self.hotel.clone(),
            review_count: self.reviews.len(),
        }
    }

    fn sorted_reviews(&self) -> Vec<Review> {
        let mut reviews = self.reviews.clone();
        reviews.sort_by(Review::display_order);
        reviews
    }
}

/// The shared aggregate store
///
/// Safe to share across worker threads behind an `Arc`. Writers to the same
/// hotel are serialized by that hotel's entry lock; readers always see a
/// hotel either before or after a whole merge, never halfway through one.
#[derive(Debug, Default)]
pub struct HotelStore {
    hotels: DashMap<HotelId, HotelEntry>,
}

impl HotelStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            hotels: DashMap::new(),
        }
    }

    /// Register a hotel.
    ///
    /// The first registration of an id wins; later ones are rejected.
    pub fn add_hotel(&self, hotel: Hotel) -> StoreResult<()> {
        match self.hotels.entry(hotel.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::DuplicateHotel(hotel.id)),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(HotelEntry::new(hotel));
                Ok(())
            }
        }
    }

    /// Copy every review of `local` into its owning hotel.
    ///
    /// Reviews for one hotel are appended and the average recomputed while
    /// holding that hotel's entry lock, so concurrent merges never lose an
    /// update or expose an average computed from a partial batch. Reviews
    /// naming an unknown hotel are returned in `dropped`.
    pub fn merge_reviews(&self, local: &LocalAggregate) -> MergeOutcome {
        let mut by_hotel: BTreeMap<&HotelId, Vec<&Review>> = BTreeMap::new();
        for review in local.reviews() {
            by_hotel.entry(&review.hotel_id).or_default().push(review);
        }

        let mut outcome = MergeOutcome::default();
        for (hotel_id, reviews) in by_hotel {
            match self.hotels.get_mut(hotel_id) {
                Some(mut entry) => outcome.merged += entry.absorb(reviews),
                None => outcome.dropped.extend(reviews.into_iter().cloned()),
            }
        }
        outcome
    }

    /// All registered hotel ids, sorted
    pub fn hotel_ids(&self) -> Vec<HotelId> {
        let mut ids: Vec<HotelId> = self.hotels.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Hotel details, including the current average rating
    pub fn hotel(&self, id: &HotelId) -> Option<Hotel> {
        self.hotels.get(id).map(|entry| entry.hotel.clone())
    }

    pub fn hotel_summary(&self, id: &HotelId) -> Option<HotelSummary> {
        self.hotels.get(id).map(|entry| entry.summary())
    }

    /// Reviews of a hotel, newest first
    pub fn reviews(&self, id: &HotelId) -> Option<Vec<Review>> {
        self.hotels.get(id).map(|entry| entry.sorted_reviews())
    }

    /// Hotels with their reviews, ordered by hotel id
    pub fn snapshot(&self) -> Vec<(Hotel, Vec<Review>)> {
        self.hotel_ids()
            .into_iter()
            .filter_map(|id| {
                self.hotels
                    .get(&id)
                    .map(|entry| (entry.hotel.clone(), entry.sorted_reviews()))
            })
            .collect()
    }

    pub fn has_hotel(&self, id: &HotelId) -> bool {
        self.hotels.contains_key(id)
    }

    pub fn hotel_count(&self) -> usize {
        self.hotels.len()
    }

    /// Total reviews attached across all hotels
    pub fn review_count(&self) -> usize {
        self.hotels.iter().map(|entry| entry.reviews.len()).sum()
    }
}
