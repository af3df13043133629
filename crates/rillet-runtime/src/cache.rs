#![forbid(unsafe_code)]

//! App-wide caches: memoized data and live resources.
//!
//! Both caches are shared by *every* session of an app — that is their
//! point, and also their hazard: anything stored here leaks across session
//! boundaries by design, so session state never belongs in them.
//!
//! - [`DataCache`] memoizes *copies*. `get_or_compute` hands each caller a
//!   clone of the stored value, so mutating the result never affects other
//!   sessions. Entries can carry a TTL.
//! - [`ResourceCache`] stores *live singletons* behind [`Arc`]. Every
//!   caller gets the same instance — the right shape for connection
//!   handles, API clients, and other things that must exist exactly once.
//!
//! Compute/init closures run **outside** the cache lock, so a cached
//! function may itself call into the cache. The cost is a benign race: if
//! two sessions miss the same key simultaneously, both compute. For the
//! data cache the last insert wins; for the resource cache the first
//! stored value wins and both callers end up sharing it.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use ahash::AHashMap;
use web_time::{Duration, Instant};

/// Identity of one memoized call: function name plus rendered arguments.
///
/// Two calls collide exactly when both components are equal, so renderings
/// must be injective per function — `["1", "2"]` and `["12"]` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    func: String,
    args: Vec<String>,
}

impl CacheKey {
    /// Build a key from a function name and its rendered arguments.
    #[must_use]
    pub fn of(func: &str, args: &[&str]) -> Self {
        Self {
            func: func.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.func, self.args.join(", "))
    }
}

struct DataEntry {
    value: Box<dyn Any + Send + Sync>,
    stored_at: Instant,
    ttl: Option<Duration>,
}

impl DataEntry {
    fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.stored_at.elapsed() >= ttl)
    }
}

/// Memoization cache handing out clones of stored values.
///
/// Keys are [`CacheKey`]s; values are type-erased. A hit requires the key
/// to match, the entry to be within its TTL, *and* the stored type to equal
/// the requested type — a type mismatch under a reused key is treated as a
/// miss and overwritten.
#[derive(Default)]
pub struct DataCache {
    entries: Mutex<AHashMap<CacheKey, DataEntry>>,
}

impl DataCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a clone of the cached value, computing and storing it first
    /// on a miss or an expired entry.
    ///
    /// `ttl` is consulted when the entry is stored: `None` caches forever.
    /// The closure runs without the cache lock held.
    pub fn get_or_compute<T, F>(&self, key: CacheKey, ttl: Option<Duration>, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        {
            let entries = self.lock();
            if let Some(entry) = entries.get(&key) {
                if !entry.is_expired() {
                    if let Some(hit) = entry.value.downcast_ref::<T>() {
                        tracing::trace!(key = %key, "data cache hit");
                        return hit.clone();
                    }
                }
            }
        }

        tracing::debug!(key = %key, "data cache miss, computing");
        let value = compute();
        self.lock().insert(
            key,
            DataEntry {
                value: Box::new(value.clone()),
                stored_at: Instant::now(),
                ttl,
            },
        );
        value
    }

    /// Drop one entry. Returns whether it existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<CacheKey, DataEntry>> {
        // A poisoned lock means a compute panicked between our short
        // critical sections; the map itself is still coherent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for DataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCache").field("len", &self.len()).finish()
    }
}

/// Singleton cache handing out shared [`Arc`]s.
///
/// The first caller to initialize a key fixes its value; everyone after
/// that shares the same instance. Use for live objects — clients, handles,
/// spawned background work — where a copy would be wrong.
#[derive(Default)]
pub struct ResourceCache {
    entries: Mutex<AHashMap<CacheKey, Arc<dyn Any + Send + Sync>>>,
}

impl ResourceCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared instance under `key`, initializing it first if
    /// absent. The closure runs without the cache lock held; if two
    /// callers race, the first stored value wins and both receive it.
    /// A type mismatch under a reused key is treated as a miss: the new
    /// instance replaces the old one and becomes the shared singleton.
    pub fn get_or_init<T, F>(&self, key: CacheKey, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        {
            let entries = self.lock();
            if let Some(stored) = entries.get(&key) {
                if let Ok(hit) = Arc::clone(stored).downcast::<T>() {
                    tracing::trace!(key = %key, "resource cache hit");
                    return hit;
                }
            }
        }

        tracing::debug!(key = %key, "resource cache miss, initializing");
        let fresh = Arc::new(init());
        let mut entries = self.lock();
        let stored = entries
            .entry(key.clone())
            .or_insert_with(|| Arc::clone(&fresh) as Arc<dyn Any + Send + Sync>)
            .clone();
        match stored.downcast::<T>() {
            Ok(shared) => shared,
            // A different type sat under this key: replace it, so later
            // callers of the new type share this instance.
            Err(_) => {
                entries.insert(key, Arc::clone(&fresh) as Arc<dyn Any + Send + Sync>);
                fresh
            }
        }
    }

    /// Drop one entry. Live `Arc`s already handed out keep working; only
    /// future lookups reinitialize. Returns whether the entry existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored singletons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[allow(clippy::type_complexity)]
    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<CacheKey, Arc<dyn Any + Send + Sync>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("len", &self.len())
            .finish()
    }
}
