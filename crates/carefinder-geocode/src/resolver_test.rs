use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::types::AddressComponents;

#[derive(Clone, Default)]
struct CountingGeocoder {
    calls: Arc<AtomicUsize>,
    answer: Option<Coordinate>,
}

impl Geocoder for CountingGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.ok_or_else(|| GeocodeError::NoMatch {
            query: address.to_owned(),
        })
    }
}

#[derive(Clone, Default)]
struct CountingSource {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl SuggestionSource for CountingSource {
    async fn candidates(&self, _query: &str) -> Result<Vec<AddressCandidate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GeocodeError::UnexpectedStatus {
                status: 503,
                url: "http://geo.test/search".to_owned(),
            });
        }
        Ok(vec![
            candidate(Some("123"), Some("Main St")),
            candidate(None, Some("Main St")),
            candidate(Some("123"), Some("Main St")),
        ])
    }
}

fn candidate(house_number: Option<&str>, road: Option<&str>) -> AddressCandidate {
    AddressCandidate {
        lat: "30.2672".to_owned(),
        lon: "-97.7431".to_owned(),
        display_name: "123, Main St, Austin, Travis County, Texas, 78701, United States".to_owned(),
        address: AddressComponents {
            house_number: house_number.map(str::to_owned),
            road: road.map(str::to_owned),
            city: Some("Austin".to_owned()),
            state: Some("TX".to_owned()),
            postcode: Some("78701".to_owned()),
            ..AddressComponents::default()
        },
    }
}

fn suggestion(label: &str, lat: &str, lon: &str) -> AddressSuggestion {
    AddressSuggestion {
        lat: lat.to_owned(),
        lon: lon.to_owned(),
        short_display_name: label.to_owned(),
        display_name: label.to_owned(),
        address: AddressComponents::default(),
    }
}

fn resolver(
    answer: Option<Coordinate>,
) -> (
    AddressResolver<CountingGeocoder, CountingSource>,
    Arc<AtomicUsize>,
) {
    let geocoder = CountingGeocoder {
        answer,
        ..CountingGeocoder::default()
    };
    let calls = Arc::clone(&geocoder.calls);
    (
        AddressResolver::new(geocoder, CountingSource::default()),
        calls,
    )
}

#[test]
fn sequence_gate_only_latest_is_current() {
    let gate = SequenceGate::new();
    let first = gate.issue();
    let second = gate.issue();
    assert!(second > first);
    assert!(!gate.is_latest(first));
    assert!(gate.is_latest(second));

    gate.invalidate();
    assert!(!gate.is_latest(second));
}

#[test]
fn sequence_gate_clones_share_state() {
    let gate = SequenceGate::new();
    let clone = gate.clone();
    let seq = clone.issue();
    assert!(gate.is_latest(seq));
    assert_eq!(gate.latest(), seq);
}

#[tokio::test]
async fn blank_query_skips_network() {
    let source = CountingSource::default();
    let calls = Arc::clone(&source.calls);
    let resolver = AddressResolver::new(CountingGeocoder::default(), source);

    assert!(resolver.fetch_suggestions("   ").await.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn suggestions_are_filtered_and_deduplicated() {
    let (resolver, _) = resolver(None);
    let suggestions = resolver.fetch_suggestions("123 Main").await;
    assert_eq!(suggestions.len(), 1);
    assert_eq!(
        suggestions[0].short_display_name,
        "123 Main St, Austin, TX, 78701"
    );
}

#[tokio::test]
async fn suggestion_errors_fail_soft() {
    let source = CountingSource {
        fail: true,
        ..CountingSource::default()
    };
    let resolver = AddressResolver::new(CountingGeocoder::default(), source);
    assert!(resolver.fetch_suggestions("123 Main").await.is_empty());
}

#[tokio::test]
async fn tagged_fetch_is_current_until_superseded() {
    let (resolver, _) = resolver(None);
    let seq = resolver.sequence().issue();
    let batch = resolver
        .fetch_suggestions_tagged(seq, "123 Main".to_owned())
        .await;
    assert_eq!(batch.seq, seq);
    assert!(resolver.is_current(batch.seq));
    assert_eq!(batch.query, "123 Main");
    assert_eq!(batch.suggestions.len(), 1);

    resolver.invalidate_suggestions();
    assert!(!resolver.is_current(batch.seq));
}

#[tokio::test]
async fn tag_issued_before_fetch_is_stale_after_newer_issue() {
    let (resolver, _) = resolver(None);
    let older = resolver.sequence().issue();
    let newer = resolver.sequence().issue();

    let batch = resolver
        .fetch_suggestions_tagged(older, "12".to_owned())
        .await;
    assert!(!resolver.is_current(batch.seq));
    assert!(resolver.is_current(newer));
}

#[tokio::test]
async fn confirmed_suggestion_bypasses_geocoder() {
    let (resolver, calls) = resolver(Some(Coordinate {
        lat: 1.0,
        lng: 1.0,
    }));
    let confirmed = suggestion("123 Main St, Austin, TX, 78701", "30.2672", "-97.7431");

    let coordinate = resolver
        .resolve_address("123 Main St, Austin, TX, 78701", Some(&confirmed))
        .await
        .unwrap();

    assert_eq!(
        coordinate,
        Coordinate {
            lat: 30.2672,
            lng: -97.7431
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn edited_text_ignores_confirmed_suggestion() {
    let answer = Coordinate {
        lat: 40.0,
        lng: -75.0,
    };
    let (resolver, calls) = resolver(Some(answer));
    let confirmed = suggestion("123 Main St, Austin, TX, 78701", "30.2672", "-97.7431");

    let coordinate = resolver
        .resolve_address("123 Main St, Austin, TX", Some(&confirmed))
        .await
        .unwrap();

    assert_eq!(coordinate, answer);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn confirmed_suggestion_with_bad_coordinates_falls_back_to_geocoder() {
    let answer = Coordinate {
        lat: 30.0,
        lng: -97.0,
    };
    let (resolver, calls) = resolver(Some(answer));
    let confirmed = suggestion("1 A St", "not-a-number", "-97.0");

    let coordinate = resolver
        .resolve_address("1 A St", Some(&confirmed))
        .await
        .unwrap();

    assert_eq!(coordinate, answer);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failure_names_the_input() {
    let (resolver, _) = resolver(None);
    let err = resolver
        .resolve_address("zzzz nowhere", None)
        .await
        .unwrap_err();

    assert_eq!(err.input, "zzzz nowhere");
    assert!(err.to_string().contains("zzzz nowhere"));
    assert!(matches!(err.source, GeocodeError::NoMatch { .. }));
}

#[tokio::test]
async fn blank_input_fails_without_geocoding() {
    let (resolver, calls) = resolver(Some(Coordinate {
        lat: 0.0,
        lng: 0.0,
    }));
    let err = resolver.resolve_address("  ", None).await.unwrap_err();
    assert!(matches!(err.source, GeocodeError::NoMatch { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
