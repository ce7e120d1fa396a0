use thiserror::Error;

/// Errors returned by the geocoding and suggestion services.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered but produced no usable coordinate.
    #[error("no usable coordinate for \"{query}\"")]
    NoMatch { query: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// An address could not be turned into a coordinate.
///
/// `Display` is the user-facing message and always names the original input.
#[derive(Debug, Error)]
#[error("We couldn't find \"{input}\". Check the address and try again.")]
pub struct ResolutionError {
    pub input: String,
    #[source]
    pub source: GeocodeError,
}

impl ResolutionError {
    #[must_use]
    pub fn new(input: impl Into<String>, source: GeocodeError) -> Self {
        Self {
            input: input.into(),
            source,
        }
    }
}
