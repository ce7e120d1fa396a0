//! Address Resolver: suggestions and address-to-coordinate resolution.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use carefinder_core::Coordinate;

use crate::error::{GeocodeError, ResolutionError};
use crate::suggest::build_suggestions;
use crate::types::{AddressCandidate, AddressSuggestion, SuggestionBatch};

/// Forward geocoding: free text to a single coordinate.
pub trait Geocoder: Send + Sync + 'static {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;
}

/// Raw autocomplete candidates for a partial address.
pub trait SuggestionSource: Send + Sync + 'static {
    fn candidates(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<AddressCandidate>, GeocodeError>> + Send;
}

/// Monotonic sequence counter deciding which suggestion fetch is current.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    latest: Arc<AtomicU64>,
}

impl SequenceGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next tag. Every previously issued tag becomes stale.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// Makes every in-flight tag stale without starting a new fetch.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Resolves addresses and serves suggestions on top of a geocoder and a
/// suggestion source.
pub struct AddressResolver<G, S> {
    geocoder: G,
    source: S,
    gate: SequenceGate,
}

impl<G, S> AddressResolver<G, S>
where
    G: Geocoder,
    S: SuggestionSource,
{
    pub fn new(geocoder: G, source: S) -> Self {
        Self {
            geocoder,
            source,
            gate: SequenceGate::new(),
        }
    }

    /// The gate used to tag suggestion fetches.
    pub fn sequence(&self) -> &SequenceGate {
        &self.gate
    }

    /// Street-level suggestions for `query`.
    ///
    /// Blank queries return an empty list without touching the network. Any
    /// transport or parse failure also yields an empty list: suggestions are
    /// a convenience and must never interrupt typing.
    pub async fn fetch_suggestions(&self, query: &str) -> Vec<AddressSuggestion> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self.source.candidates(query).await {
            Ok(candidates) => {
                let total = candidates.len();
                let suggestions = build_suggestions(candidates);
                tracing::debug!(
                    query,
                    total,
                    kept = suggestions.len(),
                    "fetched address suggestions"
                );
                suggestions
            }
            Err(err) => {
                tracing::debug!(query, error = %err, "suggestion fetch failed, showing none");
                Vec::new()
            }
        }
    }

    /// Fetches suggestions for `query` and stamps the batch with `seq`.
    ///
    /// `seq` must come from [`SequenceGate::issue`] on this resolver's gate,
    /// taken when the edit was made rather than when the lookup starts. The
    /// caller decides whether to apply the batch by checking
    /// [`AddressResolver::is_current`] at the moment it arrives.
    pub async fn fetch_suggestions_tagged(&self, seq: u64, query: String) -> SuggestionBatch {
        let suggestions = self.fetch_suggestions(&query).await;
        SuggestionBatch {
            seq,
            query,
            suggestions,
        }
    }

    #[must_use]
    pub fn is_current(&self, seq: u64) -> bool {
        self.gate.is_latest(seq)
    }

    /// Makes all outstanding suggestion fetches stale.
    pub fn invalidate_suggestions(&self) {
        self.gate.invalidate();
    }

    /// Converts `input` into a coordinate.
    ///
    /// When `confirmed` is a suggestion whose label equals `input` exactly,
    /// its coordinate is used as-is and no network call is made. Otherwise
    /// the geocoder is asked.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] carrying `input` when no usable
    /// coordinate can be obtained.
    pub async fn resolve_address(
        &self,
        input: &str,
        confirmed: Option<&AddressSuggestion>,
    ) -> Result<Coordinate, ResolutionError> {
        if let Some(suggestion) = confirmed.filter(|s| s.short_display_name == input) {
            if let Some(coordinate) = suggestion.coordinate() {
                tracing::debug!(input, %coordinate, "using confirmed suggestion");
                return Ok(coordinate);
            }
            tracing::warn!(
                input,
                lat = %suggestion.lat,
                lon = %suggestion.lon,
                "confirmed suggestion has unusable coordinates; geocoding instead"
            );
        }

        if input.trim().is_empty() {
            return Err(ResolutionError::new(
                input,
                GeocodeError::NoMatch {
                    query: input.to_owned(),
                },
            ));
        }

        self.geocoder.geocode(input).await.map_err(|source| {
            tracing::warn!(input, error = %source, "address resolution failed");
            ResolutionError::new(input, source)
        })
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
