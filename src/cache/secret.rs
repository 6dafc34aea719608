//! `SecretCache`: one named secret, cached for a fixed duration.
//!
//! Fetches cost money and rate-limit quota while rotation is rare, so
//! the default duration is long. Callers that know the cached value is
//! wrong (the database just rejected it) pass `force = true` to skip
//! the wait.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use zeroize::Zeroizing;

use crate::errors::Result;
use crate::provider::SecretFetcher;
use crate::source::CredentialSource;

use super::clock::{Clock, SystemClock};

/// How long a fetched secret is served before it is fetched again.
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Mutable state, only ever touched with the lock held.
#[derive(Default)]
struct CacheState {
    /// Last successfully fetched value (wiped on drop).
    value: Zeroizing<String>,

    /// When `value` was fetched; `None` until the first success.
    last_refreshed: Option<DateTime<Utc>>,

    /// Successful calls to the fetcher.
    calls_made: u64,
}

/// A TTL-bounded cache in front of a [`SecretFetcher`].
pub struct SecretCache {
    name: String,
    cache_duration: Duration,
    fetcher: Box<dyn SecretFetcher>,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

impl SecretCache {
    /// Create a cache for the secret `name` with the default duration.
    pub fn new(name: impl Into<String>, fetcher: impl SecretFetcher + 'static) -> Self {
        Self::from_boxed(name, Box::new(fetcher))
    }

    /// Same as [`SecretCache::new`] for an already boxed fetcher.
    pub fn from_boxed(name: impl Into<String>, fetcher: Box<dyn SecretFetcher>) -> Self {
        Self {
            name: name.into(),
            cache_duration: DEFAULT_CACHE_DURATION,
            fetcher,
            clock: Arc::new(SystemClock),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn with_cache_duration(mut self, cache_duration: Duration) -> Self {
        self.cache_duration = cache_duration;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cache_duration(&self) -> Duration {
        self.cache_duration
    }

    /// When the cached value was last fetched, if ever.
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_refreshed
    }

    /// Return the secret, fetching it if `force` is set or the cached
    /// value has expired.
    ///
    /// A failed fetch leaves the cached value and its timestamp exactly
    /// as they were.
    pub fn get(&self, force: bool) -> Result<String> {
        let mut state = self.state.lock();
        let now = self.clock.now();

        if force || self.is_expired(&state, now) {
            tracing::debug!(secret = %self.name, force, "fetching secret from provider");
            let fresh = Zeroizing::new(self.fetcher.fetch(&self.name)?);
            state.calls_made += 1;
            state.value = fresh;
            state.last_refreshed = Some(self.clock.now());
        } else {
            tracing::trace!(secret = %self.name, "serving cached secret");
        }

        Ok(String::clone(&state.value))
    }

    /// Number of successful calls made to the provider.
    pub fn calls_made(&self) -> u64 {
        self.state.lock().calls_made
    }

    fn is_expired(&self, state: &CacheState, now: DateTime<Utc>) -> bool {
        let Some(last) = state.last_refreshed else {
            return true;
        };
        // A duration too large for chrono never expires.
        chrono::Duration::from_std(self.cache_duration)
            .ok()
            .and_then(|ttl| last.checked_add_signed(ttl))
            .is_some_and(|expires_at| now >= expires_at)
    }
}

impl CredentialSource for SecretCache {
    fn get(&self, force: bool) -> Result<String> {
        SecretCache::get(self, force)
    }

    fn calls_made(&self) -> u64 {
        SecretCache::calls_made(self)
    }
}

impl std::fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCache")
            .field("name", &self.name)
            .field("cache_duration", &self.cache_duration)
            .field("calls_made", &self.calls_made())
            .finish_non_exhaustive()
    }
}
