//! Search-State Controller for the provider results view.
//!
//! The controller owns the [`SearchContext`], the address edit box and the
//! suggestion popup. User actions are plain method calls. Network work runs
//! on spawned tasks that report back through a channel as
//! [`BackgroundEvent`]s, which the owner feeds to [`SearchController::apply`]
//! (or lets [`SearchController::pump`] do it).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use carefinder_core::{
    distance_miles, AppConfig, ConfigError, CoreError, Coordinate, InsuranceCatalog,
    InsuranceSelection, NavigationPayload, ProviderResult, RadiusMiles, ReturnPayload,
    SearchLocation, CONTINENTAL_FALLBACK, UNKNOWN_LOCATION,
};
use carefinder_geocode::{
    AddressResolver, AddressSuggestion, Geocoder, ResolutionError, SuggestionBatch,
    SuggestionDebouncer, SuggestionSource, DEFAULT_QUIET_PERIOD,
};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::context::SearchContext;
use crate::error::{OutOfRange, SubmitError};
use crate::map::{MapStatus, MapView, DEFAULT_ZOOM, SELECTED_ZOOM};

/// Work finished off the controller's task.
#[derive(Debug)]
pub enum BackgroundEvent {
    Suggestions(SuggestionBatch),
    Resolved {
        input: String,
        outcome: Result<Coordinate, ResolutionError>,
    },
}

impl From<SuggestionBatch> for BackgroundEvent {
    fn from(batch: SuggestionBatch) -> Self {
        Self::Suggestions(batch)
    }
}

/// The single user-facing message line of the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusMessage {
    #[default]
    None,
    EmptyAddress,
    Resolution(String),
    MapUnavailable,
}

impl StatusMessage {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::EmptyAddress => Some("Please enter an address"),
            Self::Resolution(text) => Some(text.as_str()),
            Self::MapUnavailable => Some("Map failed to load. Please reload the page."),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text().unwrap_or_default())
    }
}

/// A visible result with its distance from the current center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry<'a> {
    pub result: &'a ProviderResult,
    pub distance_miles: f64,
    /// Distance rounded for display, e.g. `"4.9 mi"`.
    pub distance_label: String,
}

/// Construction-time settings.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub default_radius: RadiusMiles,
    pub catalog: InsuranceCatalog,
    pub quiet_period: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            default_radius: RadiusMiles::default(),
            catalog: InsuranceCatalog::builtin(),
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl ControllerOptions {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a configured insurance catalog file cannot
    /// be loaded.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            default_radius: config.default_radius,
            catalog: config.insurance_catalog()?,
            quiet_period: Duration::from_millis(config.suggest_debounce_ms),
        })
    }
}

/// Picks the initial center: the caller's location, else the first result
/// with coordinates, else the continental fallback.
fn seed_location(supplied: Option<SearchLocation>, results: &[ProviderResult]) -> SearchLocation {
    if let Some(location) = supplied.filter(|l| l.coordinate.is_valid()) {
        return location;
    }
    results
        .iter()
        .find_map(ProviderResult::coordinate)
        .map_or_else(
            || SearchLocation::unknown(CONTINENTAL_FALLBACK),
            SearchLocation::unknown,
        )
}

pub struct SearchController<G, S, M> {
    results: Vec<ProviderResult>,
    loading: bool,
    context: SearchContext,
    catalog: InsuranceCatalog,
    resolver: Arc<AddressResolver<G, S>>,
    debouncer: SuggestionDebouncer<G, S, BackgroundEvent>,
    events_tx: mpsc::UnboundedSender<BackgroundEvent>,
    events_rx: mpsc::UnboundedReceiver<BackgroundEvent>,
    map: M,
    map_status: MapStatus,
    address_input: String,
    confirmed: Option<AddressSuggestion>,
    suggestions: Vec<AddressSuggestion>,
    status: StatusMessage,
    processing_location: bool,
}

impl<G, S, M> SearchController<G, S, M>
where
    G: Geocoder,
    S: SuggestionSource,
    M: MapView,
{
    /// Seeds the view from `payload` and syncs the map once.
    pub fn new(
        payload: NavigationPayload,
        resolver: Arc<AddressResolver<G, S>>,
        map: M,
        options: ControllerOptions,
    ) -> Self {
        let ControllerOptions {
            default_radius,
            catalog,
            quiet_period,
        } = options;
        let NavigationPayload {
            results,
            search_location,
            insurance,
            loading,
        } = payload;

        let location = seed_location(search_location, &results);
        let insurance =
            insurance.map_or_else(InsuranceSelection::none, |s| s.sanitized(&catalog));
        let address_input = if location.address == UNKNOWN_LOCATION {
            String::new()
        } else {
            location.address.clone()
        };
        let context = SearchContext::new(location, default_radius, insurance);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let debouncer =
            SuggestionDebouncer::new(Arc::clone(&resolver), quiet_period, events_tx.clone());

        tracing::info!(
            results = results.len(),
            loading,
            center = %context.location.coordinate,
            radius = %context.radius,
            provider = %context.insurance.provider,
            "results view opened"
        );

        let mut controller = Self {
            results,
            loading,
            context,
            catalog,
            resolver,
            debouncer,
            events_tx,
            events_rx,
            map,
            map_status: MapStatus::Ready,
            address_input,
            confirmed: None,
            suggestions: Vec::new(),
            status: StatusMessage::None,
            processing_location: false,
        };
        controller.sync_map(Some(DEFAULT_ZOOM));
        controller
    }

    // -----------------------------------------------------------------------
    // accessors
    // -----------------------------------------------------------------------

    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Results within the radius of the current center, in input order.
    pub fn filtered(&self) -> Vec<&ProviderResult> {
        self.context.visible(&self.results)
    }

    /// [`SearchController::filtered`] paired with distances and labels.
    pub fn ranked_entries(&self) -> Vec<RankedEntry<'_>> {
        let center = self.context.location.coordinate;
        self.filtered()
            .into_iter()
            .filter_map(|result| {
                let distance = distance_miles(center, result.coordinate()?);
                Some(RankedEntry {
                    result,
                    distance_miles: distance,
                    distance_label: format!("{distance:.1} mi"),
                })
            })
            .collect()
    }

    pub fn address_input(&self) -> &str {
        &self.address_input
    }

    pub fn suggestions(&self) -> &[AddressSuggestion] {
        &self.suggestions
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// `true` while a submitted address is being resolved. The submit
    /// control should be disabled meanwhile.
    pub fn is_processing_location(&self) -> bool {
        self.processing_location
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// State handed back to the intake form.
    pub fn return_payload(&self) -> ReturnPayload {
        ReturnPayload {
            insurance: self.context.insurance.clone(),
            search_location: self.context.location.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // user actions
    // -----------------------------------------------------------------------

    pub fn set_radius(&mut self, radius: RadiusMiles) {
        if radius == self.context.radius {
            return;
        }
        self.context = self.context.with_radius(radius);
        tracing::debug!(%radius, visible = self.filtered().len(), "radius changed");
        self.render_markers();
    }

    /// Switches provider and clears the plan.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProvider`] if `provider` is not in the
    /// catalog. The current selection is left untouched.
    pub fn set_provider(&mut self, provider: &str) -> Result<(), CoreError> {
        let insurance = InsuranceSelection::for_provider(&self.catalog, provider)?;
        self.context = self.context.with_insurance(insurance);
        tracing::debug!(provider, "insurance provider changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CoreError`] if the plan is not offered by the current
    /// provider. The current selection is left untouched.
    pub fn set_plan(&mut self, plan: &str) -> Result<(), CoreError> {
        let insurance = self.context.insurance.with_plan(&self.catalog, plan)?;
        self.context = self.context.with_insurance(insurance);
        tracing::debug!(plan, "insurance plan changed");
        Ok(())
    }

    /// Replaces the edit box text and schedules a suggestion lookup.
    ///
    /// The open suggestion list is closed and any lookup still in flight
    /// becomes stale. Blank text cancels the pending lookup instead of
    /// scheduling one.
    pub fn edit_address(&mut self, text: impl Into<String>) {
        self.address_input = text.into();
        self.suggestions.clear();
        if matches!(
            self.status,
            StatusMessage::EmptyAddress | StatusMessage::Resolution(_)
        ) {
            self.status = StatusMessage::None;
        }

        if self.address_input.trim().is_empty() {
            self.debouncer.cancel();
            self.resolver.invalidate_suggestions();
        } else {
            self.debouncer.schedule(self.address_input.clone());
        }
    }

    /// Puts the chosen suggestion's label in the edit box and remembers it as
    /// confirmed for the next submit.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index` does not name an open suggestion.
    pub fn select_suggestion(&mut self, index: usize) -> Result<(), OutOfRange> {
        let suggestion = self.suggestions.get(index).cloned().ok_or(OutOfRange {
            index,
            len: self.suggestions.len(),
        })?;
        tracing::debug!(label = %suggestion.short_display_name, "suggestion selected");
        self.address_input.clone_from(&suggestion.short_display_name);
        self.confirmed = Some(suggestion);
        self.close_suggestions();
        Ok(())
    }

    pub fn dismiss_suggestions(&mut self) {
        self.close_suggestions();
    }

    /// Starts resolving the edit box text.
    ///
    /// The outcome arrives later as [`BackgroundEvent::Resolved`].
    ///
    /// # Errors
    ///
    /// - [`SubmitError::AlreadyResolving`] while a previous submit is pending.
    /// - [`SubmitError::EmptyAddress`] if the text is blank. No lookup is made.
    pub fn submit_address(&mut self) -> Result<(), SubmitError> {
        if self.processing_location {
            return Err(SubmitError::AlreadyResolving);
        }
        let input = self.address_input.trim().to_owned();
        if input.is_empty() {
            self.set_status(StatusMessage::EmptyAddress);
            return Err(SubmitError::EmptyAddress);
        }

        self.processing_location = true;
        self.set_status(StatusMessage::None);
        self.close_suggestions();

        let resolver = Arc::clone(&self.resolver);
        let confirmed = self.confirmed.clone();
        let events = self.events_tx.clone();
        tracing::info!(input = %input, confirmed = confirmed.is_some(), "resolving address");

        tokio::spawn(async move {
            let outcome = resolver.resolve_address(&input, confirmed.as_ref()).await;
            if events
                .send(BackgroundEvent::Resolved { input, outcome })
                .is_err()
            {
                tracing::debug!("controller dropped before address resolved");
            }
        });
        Ok(())
    }

    /// Pans to the `index`-th visible result and zooms in on it.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index` is past the visible list.
    pub fn select_result(&mut self, index: usize) -> Result<(), OutOfRange> {
        let visible = self.filtered();
        let len = visible.len();
        let target = visible
            .get(index)
            .and_then(|r| r.coordinate())
            .ok_or(OutOfRange { index, len })?;

        if self.map_status.is_ready() {
            self.map.pan_to(target);
            self.map.set_zoom(SELECTED_ZOOM);
        }
        Ok(())
    }

    /// Marks the map as unusable for the rest of the view.
    pub fn map_load_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!(reason = %reason, "map failed to load");
        self.map_status = MapStatus::Failed(reason);
        self.status = StatusMessage::MapUnavailable;
    }

    // -----------------------------------------------------------------------
    // background events
    // -----------------------------------------------------------------------

    /// Folds a finished background task into the view.
    pub fn apply(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Suggestions(batch) => {
                if !self.resolver.is_current(batch.seq) {
                    tracing::debug!(seq = batch.seq, query = %batch.query, "ignoring stale suggestions");
                    return;
                }
                self.suggestions = batch.suggestions;
            }
            BackgroundEvent::Resolved { input, outcome } => {
                self.processing_location = false;
                match outcome {
                    Ok(coordinate) => {
                        self.context = self
                            .context
                            .with_location(SearchLocation::new(coordinate, input));
                        self.confirmed = None;
                        self.close_suggestions();
                        self.set_status(StatusMessage::None);
                        tracing::info!(
                            center = %coordinate,
                            visible = self.filtered().len(),
                            "search center moved"
                        );
                        self.sync_map(None);
                    }
                    Err(err) => {
                        tracing::warn!(input = %err.input, error = %err.source, "address not resolved");
                        self.set_status(StatusMessage::Resolution(err.to_string()));
                    }
                }
            }
        }
    }

    /// Waits for the next background event without applying it.
    pub async fn next_event(&mut self) -> Option<BackgroundEvent> {
        self.events_rx.recv().await
    }

    /// Waits for the next background event and applies it.
    ///
    /// Blocks until some background task reports, so only call it when a
    /// submit or a suggestion lookup is outstanding.
    pub async fn pump(&mut self) {
        if let Some(event) = self.next_event().await {
            self.apply(event);
        }
    }

    /// Applies every event that is already waiting. Returns how many were
    /// applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    // -----------------------------------------------------------------------
    // internals
    // -----------------------------------------------------------------------

    fn close_suggestions(&mut self) {
        self.suggestions.clear();
        self.debouncer.cancel();
        self.resolver.invalidate_suggestions();
    }

    fn set_status(&mut self, status: StatusMessage) {
        if self.map_status.is_ready() {
            self.status = status;
        }
    }

    fn render_markers(&mut self) {
        if !self.map_status.is_ready() {
            return;
        }
        let visible = self.context.visible(&self.results);
        self.map.render_markers(&visible);
    }

    fn sync_map(&mut self, zoom: Option<u8>) {
        if !self.map_status.is_ready() {
            return;
        }
        self.map.set_center(self.context.location.coordinate);
        if let Some(level) = zoom {
            self.map.set_zoom(level);
        }
        self.render_markers();
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
