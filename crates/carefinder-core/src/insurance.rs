//! Insurance provider/plan catalog and the user's selection.
//!
//! The provider list is a closed set. A plan may only be chosen once a real
//! provider is selected, and changing the provider always clears the plan.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError};

/// Catalog entry meaning "the user has no insurance".
pub const NO_INSURANCE: &str = "No Insurance";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceProvider {
    pub name: String,
    #[serde(default)]
    pub plans: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCatalog {
    pub providers: Vec<InsuranceProvider>,
}

impl InsuranceCatalog {
    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |name: &str, plans: &[&str]| InsuranceProvider {
            name: name.to_string(),
            plans: plans.iter().map(|p| (*p).to_string()).collect(),
        };

        Self {
            providers: vec![
                entry(NO_INSURANCE, &[]),
                entry(
                    "Aetna",
                    &["Aetna Choice POS II", "Aetna Open Access", "Aetna HMO"],
                ),
                entry(
                    "Blue Cross Blue Shield",
                    &["BlueCard PPO", "Blue Choice HMO", "Blue Advantage"],
                ),
                entry("Cigna", &["Open Access Plus", "LocalPlus", "Cigna HMO"]),
                entry(
                    "UnitedHealthcare",
                    &["Choice Plus", "Navigate HMO", "Options PPO"],
                ),
                entry("Humana", &["Gold Plus HMO", "Choice PPO"]),
                entry("Kaiser Permanente", &["Traditional HMO", "Deductible HMO"]),
                entry("Medicare", &["Original Medicare", "Medicare Advantage"]),
                entry("Medicaid", &["Standard Medicaid"]),
            ],
        }
    }

    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&InsuranceProvider> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Plans offered by `provider`; empty for unknown providers and for
    /// [`NO_INSURANCE`].
    #[must_use]
    pub fn plans_for(&self, provider: &str) -> &[String] {
        self.provider(provider)
            .map(|p| p.plans.as_slice())
            .unwrap_or_default()
    }
}

impl Default for InsuranceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The provider/plan pair the user has chosen. An empty `plan` means no plan
/// is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceSelection {
    pub provider: String,
    #[serde(default)]
    pub plan: String,
}

impl InsuranceSelection {
    #[must_use]
    pub fn none() -> Self {
        Self {
            provider: NO_INSURANCE.to_string(),
            plan: String::new(),
        }
    }

    /// Builds and validates a selection against `catalog`.
    ///
    /// # Errors
    ///
    /// See [`InsuranceSelection::validate`].
    pub fn new(
        catalog: &InsuranceCatalog,
        provider: impl Into<String>,
        plan: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let selection = Self {
            provider: provider.into(),
            plan: plan.into(),
        };
        selection.validate(catalog)?;
        Ok(selection)
    }

    #[must_use]
    pub fn has_insurance(&self) -> bool {
        self.provider != NO_INSURANCE
    }

    /// # Errors
    ///
    /// - [`CoreError::UnknownProvider`] if the provider is not in the catalog.
    /// - [`CoreError::PlanWithoutProvider`] if a plan is set alongside [`NO_INSURANCE`].
    /// - [`CoreError::UnknownPlan`] if the plan is not offered by the provider.
    pub fn validate(&self, catalog: &InsuranceCatalog) -> Result<(), CoreError> {
        let provider = catalog
            .provider(&self.provider)
            .ok_or_else(|| CoreError::UnknownProvider(self.provider.clone()))?;

        if self.plan.is_empty() {
            return Ok(());
        }
        if !self.has_insurance() {
            return Err(CoreError::PlanWithoutProvider(self.plan.clone()));
        }
        if !provider.plans.iter().any(|p| *p == self.plan) {
            return Err(CoreError::UnknownPlan {
                provider: self.provider.clone(),
                plan: self.plan.clone(),
            });
        }
        Ok(())
    }

    /// A selection for `provider` with no plan chosen.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProvider`] if `provider` is not in the catalog.
    pub fn for_provider(catalog: &InsuranceCatalog, provider: &str) -> Result<Self, CoreError> {
        Self::new(catalog, provider, String::new())
    }

    /// Returns a selection with the same provider and `plan` chosen.
    ///
    /// # Errors
    ///
    /// Same as [`InsuranceSelection::validate`].
    pub fn with_plan(&self, catalog: &InsuranceCatalog, plan: &str) -> Result<Self, CoreError> {
        Self::new(catalog, self.provider.clone(), plan)
    }

    /// Best-effort repair of an externally supplied selection: an invalid
    /// plan is dropped, and an unknown provider falls back to
    /// [`NO_INSURANCE`].
    #[must_use]
    pub fn sanitized(self, catalog: &InsuranceCatalog) -> Self {
        if self.validate(catalog).is_ok() {
            return self;
        }
        if catalog.provider(&self.provider).is_some() {
            Self {
                provider: self.provider,
                plan: String::new(),
            }
        } else {
            Self::none()
        }
    }
}

impl Default for InsuranceSelection {
    fn default() -> Self {
        Self::none()
    }
}

/// Load and validate an insurance catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_insurance_catalog(path: &Path) -> Result<InsuranceCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: InsuranceCatalog = serde_yaml::from_str(&content)?;
    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &InsuranceCatalog) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for provider in &catalog.providers {
        if provider.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(provider.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider: '{}'",
                provider.name
            )));
        }

        let mut seen_plans = HashSet::new();
        for plan in &provider.plans {
            if plan.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "provider '{}' has an empty plan name",
                    provider.name
                )));
            }
            if !seen_plans.insert(plan.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "provider '{}' lists plan '{}' more than once",
                    provider.name, plan
                )));
            }
        }
    }

    match catalog.provider(NO_INSURANCE) {
        None => Err(ConfigError::Validation(format!(
            "catalog must include '{NO_INSURANCE}'"
        ))),
        Some(none) if !none.plans.is_empty() => Err(ConfigError::Validation(format!(
            "'{NO_INSURANCE}' must not list any plans"
        ))),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
#[path = "insurance_test.rs"]
mod tests;
