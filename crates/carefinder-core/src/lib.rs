pub mod app_config;
pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod insurance;
pub mod navigation;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use filter::{filter_results, is_within_radius};
pub use geo::{distance_miles, Coordinate, CONTINENTAL_FALLBACK, EARTH_RADIUS_MILES};
pub use insurance::{
    load_insurance_catalog, InsuranceCatalog, InsuranceProvider, InsuranceSelection, NO_INSURANCE,
};
pub use navigation::{NavigationPayload, ReturnPayload};
pub use types::{ProviderResult, RadiusMiles, SearchLocation, UNKNOWN_LOCATION};
