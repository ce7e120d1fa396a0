//! Address resolution for the provider results view.
//!
//! Turns free-text addresses into coordinates, either from a suggestion the
//! user already confirmed or through a geocoding service. Also serves
//! debounced, sequence-tagged autocomplete suggestions.

pub mod client;
pub mod debounce;
pub mod error;
pub mod resolver;
pub(crate) mod retry;
pub mod suggest;
pub mod types;

pub use client::{NominatimClient, NominatimOptions};
pub use debounce::{SuggestionDebouncer, DEFAULT_QUIET_PERIOD};
pub use error::{GeocodeError, ResolutionError};
pub use resolver::{AddressResolver, Geocoder, SequenceGate, SuggestionSource};
pub use suggest::{build_suggestions, short_display_name};
pub use types::{AddressCandidate, AddressComponents, AddressSuggestion, SuggestionBatch};
