//! Caching layer for breed lookups
//!
//! [`CachingBreedProvider`] wraps any [`BreedProvider`] and memoizes successful
//! lookups by normalized breed name. Failures are never cached: a breed that
//! failed is sent to the delegate again on the next lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::provider::{BreedNotFound, BreedProvider, SubBreedList};

/// Normalized cache key: trimmed and lowercased breed name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreedKey(String);

impl BreedKey {
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that reached the delegate
    pub misses: u64,
    /// Breeds currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage of all lookups
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// Memoizing decorator over a [`BreedProvider`].
///
/// The map lock is only held for short reads and writes, never across a
/// delegate call. Misses for one key are serialized through a per-key slot and
/// re-check the cache once they hold it, so concurrent lookups of the same breed
/// reach the delegate at most once while other breeds proceed. The cache is
/// unbounded and entries never expire.
pub struct CachingBreedProvider<P> {
    delegate: P,
    state: Mutex<CacheState>,
    calls_made: AtomicU64,
    hits: AtomicU64,
}

/// Counters are only bumped while this state is locked
#[derive(Default)]
struct CacheState {
    entries: HashMap<BreedKey, SubBreedList>,
    in_flight: HashMap<BreedKey, Arc<Mutex<()>>>,
}

impl<P: BreedProvider> CachingBreedProvider<P> {
    pub fn new(delegate: P) -> Self {
        Self {
            delegate,
            state: Mutex::new(CacheState::default()),
            calls_made: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Look up the sub-breeds of `breed`, consulting the cache first.
    ///
    /// On a miss the delegate receives `breed` unmodified; normalization only
    /// applies to the cache key.
    pub async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        let key = BreedKey::normalize(breed);

        let slot = {
            let mut state = self.state.lock().await;
            if let Some(subs) = self.cached(&state, &key) {
                return Ok(subs);
            }
            state.in_flight.entry(key.clone()).or_default().clone()
        };

        let _in_flight = slot.lock().await;

        {
            let state = self.state.lock().await;
            // Another lookup may have filled the entry while we waited
            if let Some(subs) = self.cached(&state, &key) {
                drop(state);
                self.release_slot(&key, &slot).await;
                return Ok(subs);
            }
            let calls = self.calls_made.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Cache miss for '{}', delegate call #{}", key, calls);
        }

        let result = self.delegate.lookup(breed).await;

        {
            let mut state = self.state.lock().await;
            match &result {
                Ok(subs) => {
                    state.entries.insert(key.clone(), subs.clone());
                }
                Err(e) => warn!("Lookup for '{}' failed, not caching: {}", breed, e),
            }
        }
        self.release_slot(&key, &slot).await;

        result
    }

    fn cached(&self, state: &CacheState, key: &BreedKey) -> Option<SubBreedList> {
        let subs = state.entries.get(key)?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("Cache hit for '{}'", key);
        Some(subs.clone())
    }

    /// Drop the in-flight slot for `key` once no other lookup is queued on it
    async fn release_slot(&self, key: &BreedKey, slot: &Arc<Mutex<()>>) {
        let mut state = self.state.lock().await;
        // One reference in the map, one held by the caller
        if Arc::strong_count(slot) <= 2 {
            state.in_flight.remove(key);
        }
    }

    /// Number of lookups that reached the delegate
    pub fn calls_made(&self) -> u64 {
        self.calls_made.load(Ordering::Relaxed)
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.calls_made.load(Ordering::Relaxed),
            entries: state.entries.len(),
        }
    }

    /// Cached breed keys in sorted order
    pub async fn cached_breeds(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut keys: Vec<String> = state
            .entries
            .keys()
            .map(|k| k.as_str().to_string())
            .collect();
        keys.sort();
        keys
    }

    pub fn delegate(&self) -> &P {
        &self.delegate
    }
}

#[async_trait]
impl<P: BreedProvider> BreedProvider for CachingBreedProvider<P> {
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        CachingBreedProvider::lookup(self, breed).await
    }
}
