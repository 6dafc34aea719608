//! Integration tests for the secret cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use credcycle::cache::{ManualClock, SecretCache};
use credcycle::{CredCycleError, Result};

/// Helper: a fetcher that returns each scripted value in turn and
/// counts how often it was called.
fn scripted(values: Vec<Result<String>>) -> (Arc<AtomicUsize>, impl Fn(&str) -> Result<String>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let values = parking_lot::Mutex::new(values.into_iter());
    let fetch = move |_: &str| -> Result<String> {
        counter.fetch_add(1, Ordering::SeqCst);
        values
            .lock()
            .next()
            .unwrap_or_else(|| Err(CredCycleError::fetch("db", "script exhausted")))
    };
    (calls, fetch)
}

fn start() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

// ---------------------------------------------------------------------------
// Rotation walk-through: cached read, then forced refresh
// ---------------------------------------------------------------------------

#[test]
fn cached_then_forced_refresh() {
    let clock = start();
    let (calls, fetch) = scripted(vec![Ok("A".into()), Ok("B".into())]);
    let cache = SecretCache::new("db", fetch)
        .with_cache_duration(Duration::from_secs(24 * 60 * 60))
        .with_clock(clock.clone());

    // t=0
    assert_eq!(cache.get(false).unwrap(), "A");
    assert_eq!(cache.calls_made(), 1);

    // t=1s: served from cache.
    clock.advance(chrono::Duration::seconds(1));
    assert_eq!(cache.get(false).unwrap(), "A");
    assert_eq!(cache.calls_made(), 1);

    // t=2s: forced.
    clock.advance(chrono::Duration::seconds(1));
    assert_eq!(cache.get(true).unwrap(), "B");
    assert_eq!(cache.calls_made(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// TTL expiry
// ---------------------------------------------------------------------------

#[test]
fn fetches_again_after_cache_duration() {
    let clock = start();
    let (calls, fetch) = scripted(vec![Ok("A".into()), Ok("B".into())]);
    let cache = SecretCache::new("db", fetch)
        .with_cache_duration(Duration::from_secs(3600))
        .with_clock(clock.clone());

    assert_eq!(cache.get(false).unwrap(), "A");
    for _ in 0..10 {
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(cache.get(false).unwrap(), "A");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    clock.advance(chrono::Duration::minutes(11));
    assert_eq!(cache.get(false).unwrap(), "B");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn force_always_fetches() {
    let (calls, fetch) = scripted((0..5).map(|i| Ok(format!("v{i}"))).collect());
    let cache = SecretCache::new("db", fetch).with_clock(start());

    for i in 0..5 {
        assert_eq!(cache.get(true).unwrap(), format!("v{i}"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(cache.calls_made(), 5);
}

// ---------------------------------------------------------------------------
// Failed fetches leave state alone
// ---------------------------------------------------------------------------

#[test]
fn failed_forced_fetch_keeps_previous_value() {
    let clock = start();
    let (calls, fetch) = scripted(vec![
        Ok("A".into()),
        Err(CredCycleError::fetch("db", "throttled")),
    ]);
    let cache = SecretCache::new("db", fetch).with_clock(clock.clone());

    assert_eq!(cache.get(false).unwrap(), "A");
    let refreshed_at = cache.last_refreshed();

    clock.advance(chrono::Duration::seconds(30));
    let err = cache.get(true).unwrap_err();
    assert!(err.is_fetch());
    assert_eq!(cache.last_refreshed(), refreshed_at);

    // Still inside the TTL: cached value, no new fetch.
    assert_eq!(cache.get(false).unwrap(), "A");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.calls_made(), 1);
}

#[test]
fn first_fetch_failure_then_success() {
    let (_calls, fetch) = scripted(vec![
        Err(CredCycleError::fetch("db", "unreachable")),
        Ok("A".into()),
    ]);
    let cache = SecretCache::new("db", fetch).with_clock(start());

    assert!(cache.get(false).is_err());
    assert!(cache.last_refreshed().is_none());
    assert_eq!(cache.get(false).unwrap(), "A");
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_readers_share_one_fetch() {
    let (calls, fetch) = scripted(vec![Ok("A".into())]);
    let cache = Arc::new(SecretCache::new("db", fetch));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get(false).unwrap())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), "A");
    }
    // The lock is held across the fetch, so later readers see the value.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
