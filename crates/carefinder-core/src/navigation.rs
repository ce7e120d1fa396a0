//! Payloads exchanged with the intake form when entering and leaving the
//! results view.

use serde::{Deserialize, Serialize};

use crate::insurance::InsuranceSelection;
use crate::types::{ProviderResult, SearchLocation};

/// State handed to the results view on navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPayload {
    #[serde(default)]
    pub results: Vec<ProviderResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_location: Option<SearchLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<InsuranceSelection>,
    #[serde(default)]
    pub loading: bool,
}

/// State emitted when the user goes back to the intake form, so the form can
/// restore what they had selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPayload {
    pub insurance: InsuranceSelection,
    pub search_location: SearchLocation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    #[test]
    fn parses_full_payload() {
        let json = r#"{
            "results": [{"name": "Clinic", "address": "1 Main St", "rating": 4.5, "lat": 30.0, "lng": -97.0}],
            "searchLocation": {"lat": 30.1, "lng": -97.1, "address": "Austin, TX"},
            "insurance": {"provider": "Aetna", "plan": "Aetna HMO"},
            "loading": false
        }"#;
        let payload: NavigationPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.results.len(), 1);
        assert_eq!(payload.results[0].rating, Some(4.5));
        assert_eq!(
            payload.search_location.unwrap().coordinate,
            Coordinate {
                lat: 30.1,
                lng: -97.1
            }
        );
        assert_eq!(payload.insurance.unwrap().plan, "Aetna HMO");
    }

    #[test]
    fn optional_fields_default() {
        let payload: NavigationPayload = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(payload.search_location.is_none());
        assert!(payload.insurance.is_none());
        assert!(!payload.loading);
    }

    #[test]
    fn return_payload_uses_camel_case() {
        let payload = ReturnPayload {
            insurance: InsuranceSelection::none(),
            search_location: SearchLocation::new(
                Coordinate {
                    lat: 1.0,
                    lng: 2.0,
                },
                "Somewhere",
            ),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["searchLocation"]["address"], "Somewhere");
        assert_eq!(value["searchLocation"]["lat"], 1.0);
        assert_eq!(value["insurance"]["provider"], "No Insurance");
    }
}
