//! Coordinates and great-circle distance.
//!
//! Distances are computed with the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_MILES`]. NaN inputs produce NaN outputs so callers can
//! detect malformed coordinates instead of treating them as zero distance.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Neutral center of the contiguous United States, used when neither the
/// caller nor the result list provides a starting point.
pub const CONTINENTAL_FALLBACK: Coordinate = Coordinate {
    lat: 39.5,
    lng: -98.35,
};

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting values outside lat ∈ [-90, 90] and
    /// lng ∈ [-180, 180] (NaN is rejected too).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coordinate = Self { lat, lng };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Great-circle distance between `a` and `b` in miles.
///
/// Symmetric, zero for identical points, and NaN-propagating.
#[must_use]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push antipodal points just past 1.0. A plain comparison
    // keeps NaN intact where `f64::min` would not.
    let h = if h > 1.0 { 1.0 } else { h };

    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}
