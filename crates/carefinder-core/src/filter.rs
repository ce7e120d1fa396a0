//! Radius filtering over a fixed result list.
//!
//! The filtered set is never stored. Callers recompute it whenever the
//! center, the radius or the result list changes.

use crate::geo::{distance_miles, Coordinate};
use crate::types::{ProviderResult, RadiusMiles};

/// Inclusive radius check. NaN distances are never within any radius.
#[must_use]
pub fn is_within_radius(distance: f64, radius: RadiusMiles) -> bool {
    distance <= f64::from(radius.get())
}

/// Returns the order-preserving subsequence of `results` within `radius`
/// miles of `center`.
///
/// Entries missing either coordinate are excluded regardless of radius.
#[must_use]
pub fn filter_results<'a>(
    results: &'a [ProviderResult],
    center: Coordinate,
    radius: RadiusMiles,
) -> Vec<&'a ProviderResult> {
    if results.is_empty() {
        return Vec::new();
    }

    results
        .iter()
        .filter(|result| {
            result
                .coordinate()
                .is_some_and(|position| is_within_radius(distance_miles(center, position), radius))
        })
        .collect()
}
