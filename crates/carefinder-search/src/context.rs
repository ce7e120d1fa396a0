use carefinder_core::{
    filter_results, InsuranceSelection, ProviderResult, RadiusMiles, SearchLocation,
};
use serde::Serialize;

/// Everything the user controls in the results view.
///
/// Transitions build a new value instead of editing fields in place, so a
/// caller never observes a center without its matching label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    pub location: SearchLocation,
    pub radius: RadiusMiles,
    pub insurance: InsuranceSelection,
}

impl SearchContext {
    #[must_use]
    pub fn new(location: SearchLocation, radius: RadiusMiles, insurance: InsuranceSelection) -> Self {
        Self {
            location,
            radius,
            insurance,
        }
    }

    #[must_use]
    pub fn with_location(&self, location: SearchLocation) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_radius(&self, radius: RadiusMiles) -> Self {
        Self {
            radius,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_insurance(&self, insurance: InsuranceSelection) -> Self {
        Self {
            insurance,
            ..self.clone()
        }
    }

    /// The subset of `results` visible under this context.
    #[must_use]
    pub fn visible<'a>(&self, results: &'a [ProviderResult]) -> Vec<&'a ProviderResult> {
        filter_results(results, self.location.coordinate, self.radius)
    }
}
