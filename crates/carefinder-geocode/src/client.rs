//! HTTP client for a Nominatim-compatible address search API.
//!
//! One endpoint (`/search`) serves both roles: a capped, country-restricted
//! candidate list for autocomplete, and a single best match for geocoding.
//! Every request carries the configured `User-Agent`, which public
//! Nominatim instances require to identify the client.

use std::time::Duration;

use carefinder_core::{AppConfig, Coordinate};
use reqwest::{Client, StatusCode, Url};

use crate::error::GeocodeError;
use crate::resolver::{Geocoder, SuggestionSource};
use crate::retry::GeocodeRetry;
use crate::types::AddressCandidate;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Request settings for [`NominatimClient`].
#[derive(Debug, Clone)]
pub struct NominatimOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Comma-separated ISO country codes the search is restricted to.
    pub country_codes: String,
    pub suggest_limit: u32,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for NominatimOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "carefinder/0.1 (provider-search)".to_string(),
            country_codes: "us".to_string(),
            suggest_limit: 5,
            max_retries: 2,
            backoff_base_ms: 250,
        }
    }
}

impl NominatimOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            country_codes: config.country_codes.clone(),
            suggest_limit: config.suggest_limit,
            max_retries: config.geocode_max_retries,
            backoff_base_ms: config.geocode_backoff_base_ms,
        }
    }
}

/// Client for the `/search` endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    options: NominatimOptions,
}

impl NominatimClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(options: NominatimOptions) -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL, options)
    }

    /// Creates a client with a custom base URL (self-hosted instance or a
    /// wiremock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(base_url: &str, options: NominatimOptions) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(options.user_agent.clone())
            .build()?;

        // A trailing slash makes `join("search")` append rather than replace
        // the last path segment of a self-hosted prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            options,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::with_base_url(
            &config.nominatim_url,
            NominatimOptions::from_app_config(config),
        )
    }

    /// Builds the `/search` URL with percent-encoded query parameters.
    pub(crate) fn search_url(&self, query: &str, limit: u32) -> Url {
        let mut url = self
            .base_url
            .join("search")
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("addressdetails", "1");
            pairs.append_pair("countrycodes", &self.options.country_codes);
            pairs.append_pair("limit", &limit.to_string());
        }
        url
    }

    /// Sends one search request and parses the candidate array.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::RateLimited`] on HTTP 429.
    /// - [`GeocodeError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::Deserialize`] if the body is not a JSON array.
    ///   Individual records that do not parse are skipped.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<AddressCandidate>, GeocodeError> {
        let url = self.search_url(query, limit);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        Ok(records
            .into_iter()
            .filter_map(|record| {
                serde_json::from_value::<AddressCandidate>(record)
                    .map_err(|e| {
                        tracing::debug!(query, error = %e, "skipping malformed search record");
                    })
                    .ok()
            })
            .collect())
    }
}

impl SuggestionSource for NominatimClient {
    async fn candidates(&self, query: &str) -> Result<Vec<AddressCandidate>, GeocodeError> {
        self.search(query, self.options.suggest_limit).await
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let candidates = GeocodeRetry::from_options(&self.options)
            .run(address, || self.search(address, 1))
            .await?;

        let coordinate = candidates
            .first()
            .and_then(AddressCandidate::coordinate)
            .ok_or_else(|| GeocodeError::NoMatch {
                query: address.to_owned(),
            })?;

        tracing::debug!(address, %coordinate, "geocoded address");
        Ok(coordinate)
    }
}
