//! Name-keyed resolution cache using moka
//!
//! Provides write-once, concurrent memoization of lookup outcomes for the
//! lifetime of a resolver. There is no eviction, expiry, or invalidation.

use crate::outcome::Outcome;
use moka::sync::Cache;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of names with a recorded outcome
    pub entry_count: u64,
    /// Lookups answered from a recorded outcome
    pub hits: u64,
    /// Lookups that had to compute the outcome
    pub misses: u64,
}

/// Write-once resolution cache
///
/// Maps a name to the outcome of resolving it. Each name is assigned at most
/// once; concurrent first-time lookups of the same name through
/// [`get_or_resolve`](Self::get_or_resolve) run the resolve closure once and
/// all observe its value.
#[derive(Debug)]
pub struct ResolutionCache<V = Outcome>
where
    V: Clone + Debug + Send + Sync + 'static,
{
    inner: Cache<String, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> ResolutionCache<V>
where
    V: Clone + Debug + Send + Sync + 'static,
{
    /// Create empty, unbounded cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Recorded outcome for name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<V> {
        self.inner.get(name)
    }

    /// Record outcome for name if none is recorded yet
    ///
    /// Returns `true` when `value` was stored. An existing outcome is never
    /// replaced.
    pub fn insert_once(&self, name: &str, value: V) -> bool {
        self.inner.entry_by_ref(name).or_insert(value).is_fresh()
    }

    /// Recorded outcome for name, computing and recording it on first use
    ///
    /// `resolve` runs at most once per name, even when several threads miss
    /// at the same time; the others wait for its value.
    pub fn get_or_resolve<F>(&self, name: &str, resolve: F) -> V
    where
        F: FnOnce() -> V,
    {
        let entry = self.inner.entry_by_ref(name).or_insert_with(resolve);
        if entry.is_fresh() {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        entry.into_value()
    }

    /// Check if name has a recorded outcome
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Number of recorded names
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Check if nothing is recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V> Default for ResolutionCache<V>
where
    V: Clone + Debug + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
