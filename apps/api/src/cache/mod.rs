//! ContentCache: process-local key→value store with passive expiry and
//! single-flight loading.
//!
//! Concurrent `get_or_load` calls for the same key collapse onto one loader
//! execution; every waiter receives a clone of its result. Failed loads are
//! never cached, so the next call retries the loader fresh.
//!
//! The slot map sits behind a short `parking_lot::Mutex` that is never held
//! across an `.await`, so loads for different keys never wait on each other.
//!
//! A load lives as long as it has at least one waiter. When the last waiter
//! is dropped before completion the load is abandoned: its in-flight handle
//! is removed and the loader future is dropped, so the next caller starts a
//! fresh load instead of resuming a stale one.

pub mod fingerprint;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

pub use fingerprint::{fingerprint, fingerprint_json, Fingerprint};

/// Freshness window for company and job data: 7 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A cached value together with its lifetime bounds.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl<K, V> CacheEntry<K, V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

type InFlight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

struct Slots<K, V, E> {
    entries: HashMap<K, CacheEntry<K, V>>,
    in_flight: HashMap<K, InFlight<V, E>>,
}

struct Inner<K, V, E> {
    slots: Mutex<Slots<K, V, E>>,
    default_ttl: Duration,
}

impl<K, V, E> Inner<K, V, E>
where
    K: Eq + Hash + Clone,
{
    /// Stores a successful load and retires the in-flight handle in one step,
    /// so a concurrent caller always sees either the flight or the entry.
    fn complete(&self, key: K, ttl: Duration, result: &Result<V, E>)
    where
        V: Clone,
    {
        let mut slots = self.slots.lock();
        slots.in_flight.remove(&key);
        if let Ok(value) = result {
            let now = Instant::now();
            slots.entries.insert(
                key.clone(),
                CacheEntry {
                    key,
                    value: value.clone(),
                    created_at: now,
                    expires_at: now + ttl,
                },
            );
        }
    }
}

/// One caller's handle on an in-flight load.
struct Waiter<K: Eq + Hash, V: Clone, E: Clone> {
    inner: Arc<Inner<K, V, E>>,
    key: K,
    flight: InFlight<V, E>,
}

impl<K: Eq + Hash, V: Clone, E: Clone> Drop for Waiter<K, V, E> {
    fn drop(&mut self) {
        let abandoned = {
            let mut slots = self.inner.slots.lock();
            // Only the slot map and this waiter still hold the load.
            let last = slots
                .in_flight
                .get(&self.key)
                .is_some_and(|f| f.ptr_eq(&self.flight) && self.flight.strong_count() == Some(2));
            if last {
                slots.in_flight.remove(&self.key)
            } else {
                None
            }
        };
        if abandoned.is_some() {
            debug!("last waiter dropped, abandoning load");
        }
    }
}

/// Generic content-addressed cache. Cheap to clone; clones share storage.
pub struct ContentCache<K, V, E> {
    inner: Arc<Inner<K, V, E>>,
}

impl<K, V, E> Clone for ContentCache<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, E> fmt::Debug for ContentCache<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCache")
            .field("default_ttl", &self.inner.default_ttl)
            .finish_non_exhaustive()
    }
}

impl<K, V, E> Default for ContentCache<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }
}

impl<K, V, E> ContentCache<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(Slots {
                    entries: HashMap::new(),
                    in_flight: HashMap::new(),
                }),
                default_ttl,
            }),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .slots
            .lock()
            .entries
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// Removes expired entries. Reads never depend on this having run.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.inner.slots.lock();
        let before = slots.entries.len();
        slots.entries.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                debug!(key = %entry.key, "purging expired entry");
            }
            live
        });
        before - slots.entries.len()
    }

    /// `get_or_load` using the cache's default TTL.
    pub async fn get_or_load_default<F, Fut>(&self, key: K, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let ttl = self.inner.default_ttl;
        self.get_or_load(key, ttl, loader).await
    }

    /// Returns the live value for `key`, or runs `loader` at most once across
    /// all concurrent callers for that key and shares its outcome.
    ///
    /// The loader is invoked lazily on first poll, after the slot lock has been
    /// released, so it may freely use this cache for other keys.
    pub async fn get_or_load<F, Fut>(&self, key: K, ttl: Duration, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let flight = {
            let mut slots = self.inner.slots.lock();

            if let Some(entry) = slots.entries.get(&key) {
                if entry.is_live(Instant::now()) {
                    debug!(
                        key = %key,
                        age_secs = entry.created_at.elapsed().as_secs(),
                        "cache hit"
                    );
                    return Ok(entry.value.clone());
                }
            }

            match slots.in_flight.get(&key) {
                Some(flight) => {
                    debug!(key = %key, "joining in-flight load");
                    flight.clone()
                }
                None => {
                    debug!(key = %key, "cache miss, starting load");
                    let inner = Arc::clone(&self.inner);
                    let load_key = key.clone();
                    let flight = async move {
                        let result = loader().await;
                        if let Err(e) = &result {
                            warn!(key = %load_key, "cache load failed: {e}");
                        }
                        inner.complete(load_key, ttl, &result);
                        result
                    }
                    .boxed()
                    .shared();
                    slots.in_flight.insert(key.clone(), flight.clone());
                    flight
                }
            }
        };

        let mut waiter = Waiter {
            inner: Arc::clone(&self.inner),
            key,
            flight,
        };
        (&mut waiter.flight).await
    }
}

// Direct entry access for in-process callers; HTTP handlers go through `get_or_load`.
#[allow(dead_code)]
impl<K, V, E> ContentCache<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Returns the value for `key` if present and not yet expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.inner.slots.lock();
        slots
            .entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    /// Inserts or overwrites `key` unconditionally, expiring after `ttl`.
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut slots = self.inner.slots.lock();
        slots.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                value,
                created_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Drops any stored value for `key`. An in-flight load is left running.
    pub fn invalidate(&self, key: &K) -> bool {
        self.inner.slots.lock().entries.remove(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
