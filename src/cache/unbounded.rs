use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::CacheStats;

/// Cache without a size bound
pub struct UnboundedCache<K, V> {
    entries: DashMap<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Eq + Hash + Clone, V: Clone> UnboundedCache<K, V> {
    /// Empty cache
    pub fn new() -> Self {
        UnboundedCache {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached value, counting a hit or a miss
    pub fn try_get(&self, key: &K) -> Option<V> {
        // Clone out so no shard guard outlives this call
        let found = self.entries.get(key).map(|entry| entry.value().clone());
        match found {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("mapping cache hit");
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
        }
        found
    }

    /// Cached value, or the result of `build` inserted under `key`
    pub fn get_or_build<E>(&self, key: K, build: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(found) = self.try_get(&key) {
            return Ok(found);
        }
        let built = build()?;
        Ok(self.entries.entry(key).or_insert(built).value().clone())
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            total: self.entries.len(),
            capacity: None,
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for UnboundedCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
