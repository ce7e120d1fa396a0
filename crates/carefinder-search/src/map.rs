//! Contract for the map that mirrors the controller's state.

use carefinder_core::{Coordinate, ProviderResult};

/// Zoom level used when the view first syncs the map.
pub const DEFAULT_ZOOM: u8 = 12;

/// Zoom level forced when a list entry is chosen.
pub const SELECTED_ZOOM: u8 = 16;

/// A map renderer driven by [`crate::SearchController`].
///
/// The controller owns no rendering logic. It only tells the map what to
/// show after each state change.
pub trait MapView {
    fn set_center(&mut self, center: Coordinate);

    fn set_zoom(&mut self, level: u8);

    /// Replaces every marker with one per entry of `results`.
    fn render_markers(&mut self, results: &[&ProviderResult]);

    fn pan_to(&mut self, target: Coordinate);
}

/// Whether the map can still be driven.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapStatus {
    #[default]
    Ready,
    /// The map failed to load. No further calls are made for the lifetime
    /// of the view.
    Failed(String),
}

impl MapStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
