use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::CacheStats;

/// Capacity-bounded cache with lazy eviction
///
/// Reads touch only the map and the counters. Each real insert appends an
/// access marker; once the approximate count passes `capacity + slack`, the
/// thread that wins the eviction gate pops the oldest markers and removes
/// their entries until the count is back at `capacity`. Threads that lose the
/// gate return immediately.
pub struct LruCache<K, V> {
    entries: DashMap<K, V>,
    markers: Mutex<VecDeque<K>>,
    count: AtomicUsize,
    capacity: usize,
    slack: usize,
    eviction: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// Cache holding about `capacity` entries (25% slack, at least one)
    pub fn new(capacity: usize) -> Self {
        LruCache {
            entries: DashMap::new(),
            markers: Mutex::new(VecDeque::new()),
            count: AtomicUsize::new(0),
            capacity,
            slack: (capacity / 4).max(1),
            eviction: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries tolerated above capacity before eviction runs
    pub fn slack(&self) -> usize {
        self.slack
    }

    /// Cached value, counting a hit or a miss
    pub fn try_get(&self, key: &K) -> Option<V> {
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

        // Insert, marker and count move together under the marker lock, which
        // `clear` also holds, so the count never drifts from the entries
        let (value, inserted) = {
            let mut markers = self.markers.lock();
            match self.entries.entry(key.clone()) {
                Entry::Occupied(existing) => (existing.get().clone(), false),
                Entry::Vacant(slot) => {
                    let value = slot.insert(built).value().clone();
                    markers.push_back(key);
                    self.count.fetch_add(1, Ordering::AcqRel);
                    (value, true)
                }
            }
        };

        if inserted {
            self.evict_if_needed();
        }
        Ok(value)
    }

    fn evict_if_needed(&self) {
        if self.count.load(Ordering::Acquire) <= self.capacity + self.slack {
            return;
        }
        // Another thread is already trimming
        let Some(_gate) = self.eviction.try_lock() else {
            return;
        };

        let mut evicted = 0usize;
        while self.count.load(Ordering::Acquire) > self.capacity {
            let mut markers = self.markers.lock();
            let Some(oldest) = markers.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                self.count.fetch_sub(1, Ordering::AcqRel);
                evicted += 1;
            }
        }

        tracing::debug!(
            evicted,
            remaining = self.count.load(Ordering::Relaxed),
            capacity = self.capacity,
            "mapping cache trimmed"
        );
    }

    /// Drop every entry and marker, reset the counters
    pub fn clear(&self) {
        let _gate = self.eviction.lock();
        let mut markers = self.markers.lock();
        self.entries.clear();
        markers.clear();
        self.count.store(0, Ordering::Release);
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
            capacity: Some(self.capacity),
        }
    }
}
