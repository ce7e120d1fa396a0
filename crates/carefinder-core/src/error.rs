use thiserror::Error;

/// Domain validation failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("coordinate out of range: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("radius {0} mi is outside the allowed range 1..=50")]
    InvalidRadius(u32),

    #[error("unknown insurance provider: '{0}'")]
    UnknownProvider(String),

    #[error("plan '{plan}' is not offered by '{provider}'")]
    UnknownPlan { provider: String, plan: String },

    #[error("plan '{0}' requires an insurance provider")]
    PlanWithoutProvider(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read insurance catalog at {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse insurance catalog: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("insurance catalog validation failed: {0}")]
    Validation(String),
}
