//! Hotel metadata document
//!
//! Layout: `{"sr": [{"id", "f", "ci", "pr", "ad", "ll": {"lat", "lng"}}]}`
//! where `f` is the display name, `ci` the city, `pr` the price code and
//! `ad` the street address. Coordinates may be numbers or numeric strings.

use super::{read_document, scalar_text, ParseError, RecordError, RejectedRecord};
use crate::model::Hotel;
use serde_json::{Map, Value};
use std::path::Path;

/// Hotels read from a metadata document
#[derive(Debug, Clone, Default)]
pub struct ParsedHotels {
    pub hotels: Vec<Hotel>,
    pub rejected: Vec<RejectedRecord>,
}

/// Load the metadata file at `path`
pub fn parse_hotels(path: &Path) -> Result<ParsedHotels, ParseError> {
    let document = read_document(path)?;
    parse_hotels_value(path, &document)
}

/// Interpret an already-parsed metadata document
pub fn parse_hotels_value(path: &Path, document: &Value) -> Result<ParsedHotels, ParseError> {
    let records = document
        .get("sr")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::Structure {
            path: path.to_path_buf(),
            detail: "expected an 'sr' array of hotels".to_string(),
        })?;

    let mut parsed = ParsedHotels::default();
    for (index, record) in records.iter().enumerate() {
        match parse_hotel(record) {
            Ok(hotel) => parsed.hotels.push(hotel),
            Err(error) => parsed.rejected.push(RejectedRecord { index, error }),
        }
    }
    Ok(parsed)
}

fn parse_hotel(record: &Value) -> Result<Hotel, RecordError> {
    let record = record.as_object().ok_or(RecordError::NotAnObject)?;
    let location = match record.get("ll") {
        None | Some(Value::Null) => return Err(RecordError::MissingField("ll")),
        Some(Value::Object(ll)) => ll,
        Some(_) => {
            return Err(RecordError::InvalidField {
                field: "ll",
                detail: "expected an object with 'lat' and 'lng'".to_string(),
            })
        }
    };

    let hotel = Hotel::new(scalar_text(record, "id")?, scalar_text(record, "f")?)
        .with_city(scalar_text(record, "ci")?)
        .with_price_code(scalar_text(record, "pr")?)
        .with_address(scalar_text(record, "ad")?)
        .with_coordinates(coordinate(location, "lat")?, coordinate(location, "lng")?);
    Ok(hotel)
}

fn coordinate(location: &Map<String, Value>, field: &'static str) -> Result<f64, RecordError> {
    let text = scalar_text(location, field)?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| RecordError::InvalidField {
            field,
            detail: format!("'{}' is not a number", text),
        })
}
