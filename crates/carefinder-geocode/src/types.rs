//! Wire and domain types for address lookup.

use carefinder_core::Coordinate;
use serde::{Deserialize, Deserializer, Serialize};

/// Structured address parts as returned by the search service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// One raw record from the search endpoint, before filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCandidate {
    #[serde(deserialize_with = "string_or_number")]
    pub lat: String,
    #[serde(deserialize_with = "string_or_number")]
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: AddressComponents,
}

impl AddressCandidate {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        parse_coordinate(&self.lat, &self.lon)
    }
}

/// A verified, street-level autocomplete entry.
///
/// `lat`/`lon` are kept exactly as the service sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    pub lat: String,
    pub lon: String,
    pub short_display_name: String,
    pub display_name: String,
    pub address: AddressComponents,
}

impl AddressSuggestion {
    /// The suggestion's coordinate, if its raw values parse and are in range.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        parse_coordinate(&self.lat, &self.lon)
    }
}

/// Suggestions for one query, tagged with the sequence number issued when
/// the fetch started.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionBatch {
    pub seq: u64,
    pub query: String,
    pub suggestions: Vec<AddressSuggestion>,
}

fn parse_coordinate(lat: &str, lon: &str) -> Option<Coordinate> {
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lon.trim().parse::<f64>().ok()?;
    Coordinate::new(lat, lng).ok()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
