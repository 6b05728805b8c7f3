//! Scoped Instance
//!
//! A [`ScopedMapper`] owns its own cache and depth policy. Closing it drops
//! the cached converters; every later call fails with [`Error::Disposed`].

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::cache::CacheStats;
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::runtime::{Mapper, PropertyMap};
use crate::types::Mappable;

/// Independently configured mapper with an explicit lifetime
pub struct ScopedMapper {
    mapper: Mapper,
    closed: AtomicBool,
}

impl ScopedMapper {
    /// Instance with its own cache and settings
    pub fn create(config: MapperConfig) -> Result<Self> {
        Ok(ScopedMapper {
            mapper: Mapper::new(config)?,
            closed: AtomicBool::new(false),
        })
    }

    fn live(&self) -> Result<&Mapper> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Disposed);
        }
        Ok(&self.mapper)
    }

    /// See [`Mapper::map_to`]
    pub fn map_to<D: Mappable, S: Mappable>(&self, source: &S) -> Result<D> {
        self.live()?.map_to(source)
    }

    /// See [`Mapper::map_into`]
    pub fn map_into<S: Mappable, D: Mappable>(&self, source: &S, destination: &mut D) -> Result<()> {
        self.live()?.map_into(source, destination)
    }

    /// See [`Mapper::map_many_to`]
    pub fn map_many_to<'a, D: Mappable, S: Mappable>(
        &self,
        sources: impl IntoIterator<Item = &'a S>,
    ) -> Result<Vec<D>> {
        self.live()?.map_many_to(sources)
    }

    /// See [`Mapper::to_property_map`]
    pub fn to_property_map<S: Mappable>(&self, source: &S) -> Result<PropertyMap> {
        self.live()?.to_property_map(source)
    }

    /// See [`Mapper::from_property_map`]
    pub fn from_property_map<D: Mappable>(&self, properties: &PropertyMap) -> Result<D> {
        self.live()?.from_property_map(properties)
    }

    /// See [`Mapper::register_hook`]
    pub fn register_hook<S, D, F>(&self, hook: F) -> Result<()>
    where
        S: Mappable,
        D: Mappable,
        F: Fn(&S, &mut D) + Send + Sync + 'static,
    {
        self.live()?.register_hook(hook);
        Ok(())
    }

    /// Drop cached converters and reset statistics
    pub fn clear_cache(&self) -> Result<()> {
        self.live()?.clear_cache();
        Ok(())
    }

    /// Cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        Ok(self.live()?.stats())
    }

    /// Release the cache; later calls fail with [`Error::Disposed`]
    ///
    /// Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.mapper.clear_cache();
            debug!("scoped mapper closed");
        }
    }

    /// Whether [`close`](Self::close) has run
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for ScopedMapper {
    fn drop(&mut self) {
        self.close();
    }
}
