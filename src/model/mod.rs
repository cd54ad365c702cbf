//! Core data structures: hotels and their reviews

mod hotel;
mod review;

pub use hotel::{Hotel, HotelId};
pub use review::{Rating, RatingError, Review};
