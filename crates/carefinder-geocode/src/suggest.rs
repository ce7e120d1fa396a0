//! Filtering and labelling of raw address candidates.

use std::collections::HashSet;

use crate::types::{AddressCandidate, AddressComponents, AddressSuggestion};

fn non_empty(part: Option<&String>) -> Option<&str> {
    part.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Short label such as `"123 Main St, Austin, TX, 78701"`.
///
/// Returns `None` unless both a house number and a road are present, so
/// street-less or number-less matches never become suggestions.
#[must_use]
pub fn short_display_name(address: &AddressComponents) -> Option<String> {
    let house_number = non_empty(address.house_number.as_ref())?;
    let road = non_empty(address.road.as_ref())?;

    let locality = non_empty(address.city.as_ref())
        .or_else(|| non_empty(address.town.as_ref()))
        .or_else(|| non_empty(address.village.as_ref()));

    let mut parts = vec![format!("{house_number} {road}")];
    parts.extend(
        [
            locality,
            non_empty(address.state.as_ref()),
            non_empty(address.postcode.as_ref()),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string),
    );

    Some(parts.join(", "))
}

/// Keeps street-level candidates with usable coordinates, labels them, and
/// drops repeated labels (first occurrence wins).
#[must_use]
pub fn build_suggestions(candidates: Vec<AddressCandidate>) -> Vec<AddressSuggestion> {
    let mut seen = HashSet::new();

    candidates
        .into_iter()
        .filter_map(|candidate| {
            candidate.coordinate()?;
            let short = short_display_name(&candidate.address)?;
            if !seen.insert(short.clone()) {
                return None;
            }
            Some(AddressSuggestion {
                lat: candidate.lat,
                lon: candidate.lon,
                short_display_name: short,
                display_name: candidate.display_name,
                address: candidate.address,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(
        house_number: Option<&str>,
        road: Option<&str>,
        city: Option<&str>,
    ) -> AddressComponents {
        AddressComponents {
            house_number: house_number.map(str::to_string),
            road: road.map(str::to_string),
            city: city.map(str::to_string),
            state: Some("TX".to_string()),
            postcode: Some("78701".to_string()),
            ..AddressComponents::default()
        }
    }

    fn candidate(address: AddressComponents) -> AddressCandidate {
        AddressCandidate {
            lat: "30.2672".to_string(),
            lon: "-97.7431".to_string(),
            display_name: "long display name".to_string(),
            address,
        }
    }

    #[test]
    fn builds_full_label() {
        let label = short_display_name(&components(Some("123"), Some("Main St"), Some("Austin")));
        assert_eq!(label.as_deref(), Some("123 Main St, Austin, TX, 78701"));
    }

    #[test]
    fn rejects_missing_house_number() {
        assert_eq!(
            short_display_name(&components(None, Some("Main St"), Some("Austin"))),
            None
        );
        assert_eq!(
            short_display_name(&components(Some("  "), Some("Main St"), Some("Austin"))),
            None
        );
    }

    #[test]
    fn rejects_missing_road() {
        assert_eq!(
            short_display_name(&components(Some("123"), None, Some("Austin"))),
            None
        );
    }

    #[test]
    fn falls_back_to_town_then_village() {
        let mut address = components(Some("9"), Some("Oak Rd"), None);
        address.village = Some("Wimberley".to_string());
        assert_eq!(
            short_display_name(&address).as_deref(),
            Some("9 Oak Rd, Wimberley, TX, 78701")
        );

        address.town = Some("Dripping Springs".to_string());
        assert_eq!(
            short_display_name(&address).as_deref(),
            Some("9 Oak Rd, Dripping Springs, TX, 78701")
        );
    }

    #[test]
    fn skips_missing_trailing_parts() {
        let address = AddressComponents {
            house_number: Some("5".to_string()),
            road: Some("Elm Ave".to_string()),
            ..AddressComponents::default()
        };
        assert_eq!(short_display_name(&address).as_deref(), Some("5 Elm Ave"));
    }

    #[test]
    fn build_suggestions_filters_and_keeps_raw_coordinates() {
        let suggestions = build_suggestions(vec![
            candidate(components(None, Some("Main St"), Some("Austin"))),
            candidate(components(Some("123"), Some("Main St"), Some("Austin"))),
        ]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(
            suggestions[0].short_display_name,
            "123 Main St, Austin, TX, 78701"
        );
        assert_eq!(suggestions[0].lat, "30.2672");
        assert_eq!(suggestions[0].lon, "-97.7431");
    }

    #[test]
    fn build_suggestions_drops_duplicate_labels() {
        let first = candidate(components(Some("1"), Some("A St"), Some("Austin")));
        let mut second = first.clone();
        second.lat = "30.0".to_string();
        let suggestions = build_suggestions(vec![first, second]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].lat, "30.2672");
    }

    #[test]
    fn build_suggestions_drops_unusable_coordinates() {
        let mut garbled = candidate(components(Some("1"), Some("A St"), Some("Austin")));
        garbled.lat = "north-ish".to_string();
        let mut out_of_range = candidate(components(Some("2"), Some("B St"), Some("Austin")));
        out_of_range.lon = "-200".to_string();
        let good = candidate(components(Some("1"), Some("A St"), Some("Austin")));

        let suggestions = build_suggestions(vec![garbled, out_of_range, good]);

        // The garbled record does not claim its label ahead of the good one.
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].short_display_name, "1 A St, Austin, TX, 78701");
        assert!(suggestions[0].coordinate().is_some());
    }
}
