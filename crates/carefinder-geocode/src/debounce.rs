//! Keystroke debouncing for address suggestions.
//!
//! At most one timer is pending at a time. Every scheduled query takes a
//! fresh sequence tag immediately, so a lookup still in flight from an
//! earlier query is already stale while the new quiet period runs. When the
//! timer elapses the lookup is handed to a detached task. Lookups are never
//! aborted; a batch whose tag is no longer the latest when it arrives is
//! dropped instead.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::resolver::{AddressResolver, Geocoder, SuggestionSource};
use crate::types::SuggestionBatch;

/// Quiet period between the last keystroke and the suggestion lookup.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Debounces suggestion lookups and forwards current batches to a channel.
///
/// `E` is the event type carried by the channel; anything that can be built
/// from a [`SuggestionBatch`] works, including `SuggestionBatch` itself.
pub struct SuggestionDebouncer<G, S, E = SuggestionBatch> {
    resolver: Arc<AddressResolver<G, S>>,
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
    sink: mpsc::UnboundedSender<E>,
}

impl<G, S, E> SuggestionDebouncer<G, S, E>
where
    G: Geocoder,
    S: SuggestionSource,
    E: From<SuggestionBatch> + Send + 'static,
{
    pub fn new(
        resolver: Arc<AddressResolver<G, S>>,
        quiet_period: Duration,
        sink: mpsc::UnboundedSender<E>,
    ) -> Self {
        Self {
            resolver,
            quiet_period,
            pending: None,
            sink,
        }
    }

    /// Arms a timer for `query`, replacing any timer that has not fired yet.
    ///
    /// The query's sequence tag is issued here, before the quiet period, so
    /// every earlier lookup is stale from this call on.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&mut self, query: impl Into<String>) {
        self.cancel();

        let query = query.into();
        let seq = self.resolver.sequence().issue();
        let resolver = Arc::clone(&self.resolver);
        let sink = self.sink.clone();
        let quiet_period = self.quiet_period;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if !resolver.is_current(seq) {
                return;
            }
            tracing::trace!(seq, query = %query, "debounce elapsed, fetching suggestions");

            // Detached so a later keystroke can abort the timer without
            // touching a lookup that has already started.
            tokio::spawn(async move {
                let batch = resolver.fetch_suggestions_tagged(seq, query).await;
                if !resolver.is_current(batch.seq) {
                    tracing::debug!(seq, query = %batch.query, "discarding stale suggestion batch");
                    return;
                }
                if sink.send(E::from(batch)).is_err() {
                    tracing::debug!(seq, "suggestion receiver dropped");
                }
            });
        }));
    }

    /// Aborts the pending timer, if any. Lookups already started are left
    /// to finish and be judged by the sequence gate.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// `true` while a timer is armed and has not fired yet.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<G, S, E> Drop for SuggestionDebouncer<G, S, E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod tests;
