use std::path::PathBuf;

use crate::error::ConfigError;
use crate::insurance::{load_insurance_catalog, InsuranceCatalog};
use crate::types::RadiusMiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub nominatim_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub suggest_debounce_ms: u64,
    pub suggest_limit: u32,
    pub country_codes: String,
    pub geocode_max_retries: u32,
    pub geocode_backoff_base_ms: u64,
    pub default_radius: RadiusMiles,
    pub insurance_catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// The configured insurance catalog, or the built-in one when no path is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the catalog file cannot be read or is invalid.
    pub fn insurance_catalog(&self) -> Result<InsuranceCatalog, ConfigError> {
        match &self.insurance_catalog_path {
            Some(path) => load_insurance_catalog(path),
            None => Ok(InsuranceCatalog::builtin()),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("nominatim_url", &self.nominatim_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("suggest_debounce_ms", &self.suggest_debounce_ms)
            .field("suggest_limit", &self.suggest_limit)
            .field("country_codes", &self.country_codes)
            .field("geocode_max_retries", &self.geocode_max_retries)
            .field("geocode_backoff_base_ms", &self.geocode_backoff_base_ms)
            .field("default_radius", &self.default_radius.get())
            .field(
                "insurance_catalog_path",
                &self
                    .insurance_catalog_path
                    .as_ref()
                    .map_or_else(|| "[builtin]".to_string(), |p| p.display().to_string()),
            )
            .finish()
    }
}
