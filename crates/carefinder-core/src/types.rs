use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::geo::Coordinate;

/// Placeholder label for a search center with no known address.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// The current search center plus its human-readable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLocation {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub address: String,
}

impl SearchLocation {
    #[must_use]
    pub fn new(coordinate: Coordinate, address: impl Into<String>) -> Self {
        Self {
            coordinate,
            address: address.into(),
        }
    }

    #[must_use]
    pub fn unknown(coordinate: Coordinate) -> Self {
        Self::new(coordinate, UNKNOWN_LOCATION)
    }
}

/// A healthcare provider returned by the upstream search.
///
/// `lat`/`lng` accept JSON numbers or numeric strings. Anything that does not
/// parse to an in-range coordinate deserializes to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_latitude",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_longitude",
        skip_serializing_if = "Option::is_none"
    )]
    pub lng: Option<f64>,
}

impl ProviderResult {
    /// Returns the provider's position when both components are present.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate { lat, lng }),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn lenient_component<'de, D>(deserializer: D, bound: f64) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrString>::deserialize(deserializer).unwrap_or(None);
    let value = match raw {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(value.filter(|v| (-bound..=bound).contains(v)))
}

fn lenient_latitude<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_component(deserializer, 90.0)
}

fn lenient_longitude<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_component(deserializer, 180.0)
}

/// Search radius in whole miles, constrained to `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RadiusMiles(u32);

impl RadiusMiles {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;
    pub const DEFAULT: u32 = 5;

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] when `miles` is outside `1..=50`.
    pub fn new(miles: u32) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&miles) {
            Ok(Self(miles))
        } else {
            Err(CoreError::InvalidRadius(miles))
        }
    }

    /// Snaps an arbitrary slider value into range.
    #[must_use]
    pub fn clamped(miles: u32) -> Self {
        Self(miles.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RadiusMiles {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for RadiusMiles {
    type Error = CoreError;

    fn try_from(miles: u32) -> Result<Self, Self::Error> {
        Self::new(miles)
    }
}

impl From<RadiusMiles> for u32 {
    fn from(radius: RadiusMiles) -> Self {
        radius.0
    }
}

impl std::fmt::Display for RadiusMiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} mi", self.0)
    }
}
