//! # Mapping Cache
//!
//! Compiled converters keyed by [`TypePair`]. Two policies share one
//! contract:
//!
//! - [`UnboundedCache`]: entries live until [`MappingCache::clear`].
//! - [`LruCache`]: capacity-bounded with lazy eviction. The entry count may
//!   exceed the capacity by a slack of 25% (at least one) before a single
//!   thread trims the oldest-inserted entries back to capacity.
//!
//! Both are lock-free on the read path. A miss builds the converter outside
//! any map guard; racing builders converge on whichever insert lands first.

mod lru;
mod unbounded;

pub use lru::LruCache;
pub use unbounded::UnboundedCache;

use std::sync::Arc;

use serde::Serialize;

use crate::config::MapperConfig;
use crate::error::Result;
use crate::plan::CompiledConverter;
use crate::types::TypePair;

/// Counters reported by a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Entries currently held
    pub total: usize,
    /// Configured capacity; `None` when unbounded
    pub capacity: Option<usize>,
}

impl CacheStats {
    /// `hits / (hits + misses)`, or 0 before any lookup
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Builder callback invoked on a miss
pub type BuildFn<'a> = &'a dyn Fn() -> Result<Arc<CompiledConverter>>;

/// Cache contract used by the mapper
pub trait MappingCache: Send + Sync {
    /// Cached converter for `pair`, building and inserting it on a miss
    ///
    /// A failed build propagates and leaves nothing behind.
    fn get_or_build(&self, pair: TypePair, build: BuildFn<'_>) -> Result<Arc<CompiledConverter>>;

    /// Cached converter for `pair`, if present
    fn try_get(&self, pair: &TypePair) -> Option<Arc<CompiledConverter>>;

    /// Drop every entry and reset the counters
    fn clear(&self);

    /// Current counters
    fn stats(&self) -> CacheStats;

    /// Number of entries
    fn len(&self) -> usize {
        self.stats().total
    }

    /// True when nothing is cached
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MappingCache for UnboundedCache<TypePair, Arc<CompiledConverter>> {
    fn get_or_build(&self, pair: TypePair, build: BuildFn<'_>) -> Result<Arc<CompiledConverter>> {
        UnboundedCache::get_or_build(self, pair, build)
    }

    fn try_get(&self, pair: &TypePair) -> Option<Arc<CompiledConverter>> {
        UnboundedCache::try_get(self, pair)
    }

    fn clear(&self) {
        UnboundedCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        UnboundedCache::stats(self)
    }
}

impl MappingCache for LruCache<TypePair, Arc<CompiledConverter>> {
    fn get_or_build(&self, pair: TypePair, build: BuildFn<'_>) -> Result<Arc<CompiledConverter>> {
        LruCache::get_or_build(self, pair, build)
    }

    fn try_get(&self, pair: &TypePair) -> Option<Arc<CompiledConverter>> {
        LruCache::try_get(self, pair)
    }

    fn clear(&self) {
        LruCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        LruCache::stats(self)
    }
}

/// Cache selected by the configuration
pub fn cache_for(config: &MapperConfig) -> Box<dyn MappingCache> {
    if config.use_lru_cache {
        Box::new(LruCache::new(config.max_cache_size))
    } else {
        Box::new(UnboundedCache::new())
    }
}
