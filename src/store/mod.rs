//! Shared aggregate store
//!
//! `HotelStore` is the single canonical dataset every ingestion unit merges
//! into. Units build a private `LocalAggregate` first and hand it to
//! `HotelStore::merge_reviews`, which copies its reviews in under the
//! store's own synchronization.

mod aggregate;
mod hotels;

pub use aggregate::LocalAggregate;
pub use hotels::{HotelStore, HotelSummary, MergeOutcome, StoreError, StoreResult};
