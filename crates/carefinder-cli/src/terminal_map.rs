//! A [`MapView`] that has no screen: it logs each call and remembers the
//! last state so the CLI can print it.

use carefinder_core::{Coordinate, ProviderResult};
use carefinder_search::MapView;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TerminalMap {
    pub(crate) center: Option<Coordinate>,
    pub(crate) zoom: Option<u8>,
    pub(crate) markers: Vec<String>,
}

impl MapView for TerminalMap {
    fn set_center(&mut self, center: Coordinate) {
        tracing::info!(%center, "map: center");
        self.center = Some(center);
    }

    fn set_zoom(&mut self, level: u8) {
        tracing::info!(level, "map: zoom");
        self.zoom = Some(level);
    }

    fn render_markers(&mut self, results: &[&ProviderResult]) {
        tracing::info!(count = results.len(), "map: markers");
        self.markers = results.iter().map(|r| r.name.clone()).collect();
    }

    fn pan_to(&mut self, target: Coordinate) {
        tracing::info!(%target, "map: pan");
        self.center = Some(target);
    }
}
