use crate::app_config::{AppConfig, Environment};
use crate::error::ConfigError;
use crate::types::RadiusMiles;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional. Parsing is decoupled from the process
/// environment so tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CAREFINDER_ENV", "development"));
    let log_level = or_default("CAREFINDER_LOG_LEVEL", "info");
    let nominatim_url = or_default(
        "CAREFINDER_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org/",
    );
    if !nominatim_url.starts_with("http://") && !nominatim_url.starts_with("https://") {
        return Err(invalid(
            "CAREFINDER_NOMINATIM_URL",
            format!("'{nominatim_url}' is not an http(s) URL"),
        ));
    }
    let user_agent = or_default("CAREFINDER_USER_AGENT", "carefinder/0.1 (provider-search)");
    if user_agent.trim().is_empty() {
        return Err(invalid(
            "CAREFINDER_USER_AGENT",
            "must not be empty".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("CAREFINDER_REQUEST_TIMEOUT_SECS", "10")?;
    let suggest_debounce_ms = parse_u64("CAREFINDER_SUGGEST_DEBOUNCE_MS", "300")?;
    let suggest_limit = parse_u32("CAREFINDER_SUGGEST_LIMIT", "5")?;
    if !(1..=50).contains(&suggest_limit) {
        return Err(invalid(
            "CAREFINDER_SUGGEST_LIMIT",
            format!("{suggest_limit} is outside 1..=50"),
        ));
    }
    let country_codes = or_default("CAREFINDER_COUNTRY_CODES", "us");
    let geocode_max_retries = parse_u32("CAREFINDER_GEOCODE_MAX_RETRIES", "2")?;
    let geocode_backoff_base_ms = parse_u64("CAREFINDER_GEOCODE_BACKOFF_BASE_MS", "250")?;
    let default_radius = RadiusMiles::new(parse_u32("CAREFINDER_DEFAULT_RADIUS_MILES", "5")?)
        .map_err(|e| invalid("CAREFINDER_DEFAULT_RADIUS_MILES", e.to_string()))?;
    let insurance_catalog_path = lookup("CAREFINDER_INSURANCE_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        nominatim_url,
        user_agent,
        request_timeout_secs,
        suggest_debounce_ms,
        suggest_limit,
        country_codes,
        geocode_max_retries,
        geocode_backoff_base_ms,
        default_radius,
        insurance_catalog_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
