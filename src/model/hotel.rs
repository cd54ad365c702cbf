//! Hotel: a registered entity that reviews attach to

use serde::{Deserialize, Serialize};

/// Unique identifier for a hotel
///
/// Serializes as a plain string, exactly as it appears in the metadata document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotelId(String);

impl HotelId {
    /// Create a HotelId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HotelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HotelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HotelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A hotel loaded from the metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Unique identifier
    pub id: HotelId,
    /// Display name
    pub name: String,
    pub city: String,
    pub price_code: String,
    /// Street address
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Running mean of all merged review ratings, `None` until the first merge
    pub average_rating: Option<f64>,
}

impl Hotel {
    /// Create a hotel with no rating yet
    pub fn new(id: impl Into<HotelId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: String::new(),
            price_code: String::new(),
            address: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            average_rating: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_price_code(mut self, price_code: impl Into<String>) -> Self {
        self.price_code = price_code.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}
