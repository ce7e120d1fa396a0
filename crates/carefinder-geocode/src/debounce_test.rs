use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use carefinder_core::Coordinate;
use tokio::sync::Notify;

use super::*;
use crate::error::GeocodeError;
use crate::types::{AddressCandidate, AddressComponents};

struct UnusedGeocoder;

impl Geocoder for UnusedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        Err(GeocodeError::NoMatch {
            query: address.to_owned(),
        })
    }
}

/// Suggestion source whose answer for a given query can be held back until
/// the test releases it.
#[derive(Clone, Default)]
struct HeldSource {
    queries: Arc<Mutex<Vec<String>>>,
    holds: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
}

impl HeldSource {
    fn hold(&self, query: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap()
            .insert(query.to_owned(), Arc::clone(&notify));
        notify
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl SuggestionSource for HeldSource {
    async fn candidates(&self, query: &str) -> Result<Vec<AddressCandidate>, GeocodeError> {
        self.queries.lock().unwrap().push(query.to_owned());
        let hold = self.holds.lock().unwrap().get(query).cloned();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        Ok(vec![AddressCandidate {
            lat: "30.2672".to_owned(),
            lon: "-97.7431".to_owned(),
            display_name: query.to_owned(),
            address: AddressComponents {
                house_number: Some("1".to_owned()),
                road: Some(query.to_owned()),
                ..AddressComponents::default()
            },
        }])
    }
}

fn debouncer(
    source: &HeldSource,
) -> (
    SuggestionDebouncer<UnusedGeocoder, HeldSource>,
    mpsc::UnboundedReceiver<SuggestionBatch>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let resolver = Arc::new(AddressResolver::new(UnusedGeocoder, source.clone()));
    (
        SuggestionDebouncer::new(resolver, DEFAULT_QUIET_PERIOD, tx),
        rx,
    )
}

#[tokio::test(start_paused = true)]
async fn keystrokes_inside_quiet_period_fetch_once() {
    let source = HeldSource::default();
    let (mut debouncer, mut rx) = debouncer(&source);

    debouncer.schedule("12");
    tokio::time::sleep(Duration::from_millis(50)).await;
    debouncer.schedule("123 Main");

    let batch = rx.recv().await.unwrap();
    assert_eq!(batch.query, "123 Main");
    assert_eq!(batch.suggestions[0].short_display_name, "1 123 Main");
    assert_eq!(source.queries(), vec!["123 Main".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_fetched_before_quiet_period() {
    let source = HeldSource::default();
    let (mut debouncer, _rx) = debouncer(&source);

    debouncer.schedule("123");
    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(source.queries().is_empty());
    assert!(debouncer.has_pending());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(source.queries(), vec!["123".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_is_discarded() {
    let source = HeldSource::default();
    let release_first = source.hold("12");
    let (mut debouncer, mut rx) = debouncer(&source);

    debouncer.schedule("12");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(source.queries(), vec!["12".to_owned()]);

    debouncer.schedule("123 Main");
    let latest = rx.recv().await.unwrap();
    assert_eq!(latest.query, "123 Main");

    // The "12" lookup finishes after the newer one and must not be delivered.
    release_first.notify_one();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(
        source.queries(),
        vec!["12".to_owned(), "123 Main".to_owned()]
    );
}

#[tokio::test(start_paused = true)]
async fn stale_response_during_next_quiet_period_is_discarded() {
    let source = HeldSource::default();
    let release_first = source.hold("12");
    let (mut debouncer, mut rx) = debouncer(&source);

    debouncer.schedule("12");
    tokio::time::sleep(Duration::from_millis(400)).await;
    debouncer.schedule("123 Main");

    // "123 Main" has not been fetched yet, so nothing newer has arrived.
    release_first.notify_one();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(source.queries(), vec!["12".to_owned()]);

    let latest = rx.recv().await.unwrap();
    assert_eq!(latest.query, "123 Main");
}

#[tokio::test(start_paused = true)]
async fn schedule_makes_earlier_tags_stale_immediately() {
    let source = HeldSource::default();
    let (tx, _rx) = mpsc::unbounded_channel::<SuggestionBatch>();
    let resolver = Arc::new(AddressResolver::new(UnusedGeocoder, source.clone()));
    let mut debouncer = SuggestionDebouncer::new(Arc::clone(&resolver), DEFAULT_QUIET_PERIOD, tx);

    let before = resolver.sequence().latest();
    debouncer.schedule("123 Main");
    assert!(!resolver.is_current(before));
    assert!(source.queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_timer() {
    let source = HeldSource::default();
    let (mut debouncer, mut rx) = debouncer(&source);

    debouncer.schedule("123 Main");
    debouncer.cancel();
    assert!(!debouncer.has_pending());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(source.queries().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn invalidation_discards_in_flight_lookup() {
    let source = HeldSource::default();
    let release = source.hold("123 Main");
    let (tx, mut rx) = mpsc::unbounded_channel::<SuggestionBatch>();
    let resolver = Arc::new(AddressResolver::new(UnusedGeocoder, source.clone()));
    let mut debouncer = SuggestionDebouncer::new(Arc::clone(&resolver), DEFAULT_QUIET_PERIOD, tx);

    debouncer.schedule("123 Main");
    tokio::time::sleep(Duration::from_millis(400)).await;
    resolver.invalidate_suggestions();
    release.notify_one();

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.try_recv().is_err());
}
