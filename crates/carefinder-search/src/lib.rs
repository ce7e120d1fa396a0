//! Search-state controller for the provider results view.
//!
//! Ties the pure filter from `carefinder-core` to the address resolver from
//! `carefinder-geocode`, and keeps a [`MapView`] in step with the result.

pub mod context;
pub mod controller;
pub mod error;
pub mod map;

pub use context::SearchContext;
pub use controller::{
    BackgroundEvent, ControllerOptions, RankedEntry, SearchController, StatusMessage,
};
pub use error::{OutOfRange, SubmitError};
pub use map::{MapStatus, MapView, DEFAULT_ZOOM, SELECTED_ZOOM};
