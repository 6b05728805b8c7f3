//! Mapper entry points
//!
//! [`Mapper`] owns one configuration, one descriptor reflector, one converter
//! cache and the registered hooks. Clones share all of them. Every public
//! call creates its own [`MapContext`], so concurrent calls never share a
//! depth counter.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use super::collection;
use super::context::MapContext;
use super::hooks::{MappingHook, TypedHook};
use super::property_map::{self, PropertyMap};
use crate::cache::{cache_for, CacheStats, MappingCache};
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::plan::{CompiledConverter, MappingPlan, PlanBuilder};
use crate::reflect::{Decorations, Reflector, ShapeDecorations, TypeDescriptor};
use crate::types::{Mappable, TypeKey, TypePair};

lazy_static::lazy_static! {
    /// Process-wide mapper with the default configuration
    static ref GLOBAL_MAPPER: Mapper = Mapper::from_parts(MapperConfig::default(), Arc::new(ShapeDecorations));
}

pub(crate) struct MapperCore {
    pub(crate) config: MapperConfig,
    pub(crate) reflector: Reflector,
    cache: Box<dyn MappingCache>,
    hooks: DashMap<TypePair, Arc<dyn MappingHook>>,
}

impl MapperCore {
    /// Cached converter for `pair`, built on a miss
    pub(crate) fn converter(&self, pair: TypePair) -> Result<Arc<CompiledConverter>> {
        self.cache.get_or_build(pair, &|| self.build_converter(pair))
    }

    fn build_converter(&self, pair: TypePair) -> Result<Arc<CompiledConverter>> {
        let plan = PlanBuilder::new(&self.reflector)
            .build(&pair)
            .map_err(|e| {
                warn!(pair = %pair, error = %e, "mapping plan build failed");
                e
            })?;
        debug!(
            pair = %pair,
            entries = plan.entries.len(),
            unresolved = plan.unresolved.len(),
            "built mapping plan"
        );
        Ok(Arc::new(CompiledConverter::compile(&plan, &self.reflector)?))
    }

    pub(crate) fn after_map(&self, pair: &TypePair, source: &dyn Any, destination: &mut dyn Any) {
        let hook = self.hooks.get(pair).map(|entry| entry.value().clone());
        if let Some(hook) = hook {
            hook.after_map(source, destination);
        }
    }

    pub(crate) fn report_truncation(&self, pair: &TypePair, max_depth: usize) {
        debug!(pair = %pair, max_depth, "depth limit reached; yielding zero value");
        self.config.logger.log(&format!(
            "morphic: max depth {} reached mapping {}; returning zero value",
            max_depth, pair
        ));
    }

    fn describe<T: Mappable>(&self) -> Result<Arc<TypeDescriptor>> {
        self.reflector.describe(&TypeKey::of::<T>())
    }
}

/// Structural object mapper
///
/// # Example
/// ```ignore
/// let mapper = Mapper::new(MapperConfig::default())?;
/// let dto: PersonDto = mapper.map_to(&person)?;
/// let dtos: Vec<PersonDto> = mapper.map_many_to(&people)?;
/// ```
#[derive(Clone)]
pub struct Mapper {
    core: Arc<MapperCore>,
}

impl Mapper {
    /// Mapper reading member decorations from the registered shapes
    pub fn new(config: MapperConfig) -> Result<Self> {
        Self::with_decorations(config, ShapeDecorations)
    }

    /// Mapper with an injected decoration capability
    pub fn with_decorations(config: MapperConfig, decorations: impl Decorations + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, Arc::new(decorations)))
    }

    fn from_parts(config: MapperConfig, decorations: Arc<dyn Decorations>) -> Self {
        let cache = cache_for(&config);
        Mapper {
            core: Arc::new(MapperCore {
                config,
                reflector: Reflector::new(decorations),
                cache,
                hooks: DashMap::new(),
            }),
        }
    }

    /// Process-wide default instance
    pub fn global() -> &'static Mapper {
        &GLOBAL_MAPPER
    }

    /// Active configuration
    pub fn config(&self) -> &MapperConfig {
        &self.core.config
    }

    /// Map `source` into a new `D`
    ///
    /// Members without a usable source keep their zero value. When the depth
    /// limit refuses even the top-level call, the result is a zero `D`.
    pub fn map_to<D: Mappable, S: Mappable>(&self, source: &S) -> Result<D> {
        let pair = TypePair::of::<S, D>();
        let ctx = MapContext::new(&self.core);
        let mapped = match ctx.map_pair(pair, source)? {
            Some(mapped) => mapped,
            None => self.core.describe::<D>()?.zero_instance()?,
        };
        downcast(mapped)
    }

    /// Overwrite the mapped members of an existing `destination`
    ///
    /// Members the plan does not cover are left as they are. Nested object
    /// members are replaced by freshly mapped instances, not merged.
    pub fn map_into<S: Mappable, D: Mappable>(&self, source: &S, destination: &mut D) -> Result<()> {
        let pair = TypePair::of::<S, D>();
        let ctx = MapContext::new(&self.core);
        let Some(_scope) = ctx.enter(&pair) else {
            return Ok(());
        };
        let converter = self.core.converter(pair)?;
        converter.populate(&ctx, source, destination)?;
        self.core.after_map(&pair, source, destination);
        Ok(())
    }

    /// Map every element; one converter serves the whole sequence
    pub fn map_many_to<'a, D: Mappable, S: Mappable>(
        &self,
        sources: impl IntoIterator<Item = &'a S>,
    ) -> Result<Vec<D>> {
        let key = TypeKey::of::<S>();
        let elements: Vec<collection::Element<'a>> = sources
            .into_iter()
            .map(|source| Some((key, source as &dyn Any)))
            .collect();

        let ctx = MapContext::new(&self.core);
        let mapped = collection::map_each(&ctx, &elements, &TypeKey::of::<D>())?;

        let mut out = Vec::with_capacity(mapped.len());
        for item in mapped {
            let instance = match item {
                Some(instance) => instance,
                None => self.core.describe::<D>()?.zero_instance()?,
            };
            out.push(downcast(instance)?);
        }
        Ok(out)
    }

    /// Readable, non-ignored members of `source` by name
    pub fn to_property_map<S: Mappable>(&self, source: &S) -> Result<PropertyMap> {
        let descriptor = self.core.describe::<S>()?;
        Ok(property_map::read_properties(&descriptor, source))
    }

    /// Build a `D` from a property map
    ///
    /// Keys match member names case-insensitively; missing keys and
    /// unconvertible values leave the member at its initial value.
    pub fn from_property_map<D: Mappable>(&self, properties: &PropertyMap) -> Result<D> {
        let descriptor = self.core.describe::<D>()?;
        let pair = TypePair::of::<D, D>();
        let ctx = MapContext::new(&self.core);
        let instance = match ctx.enter(&pair) {
            Some(_scope) => property_map::build_from(&ctx, &descriptor, properties)?,
            None => descriptor.zero_instance()?,
        };
        downcast(instance)
    }

    /// Descriptor of a registered type
    pub fn describe<T: Mappable>(&self) -> Result<Arc<TypeDescriptor>> {
        self.core.describe::<T>()
    }

    /// Mapping plan for `S -> D`, built fresh for inspection
    pub fn plan<S: Mappable, D: Mappable>(&self) -> Result<MappingPlan> {
        PlanBuilder::new(&self.core.reflector).build(&TypePair::of::<S, D>())
    }

    /// Fail when any destination member of `S -> D` has no source
    pub fn validate<S: Mappable, D: Mappable>(&self) -> Result<()> {
        let plan = self.plan::<S, D>()?;
        if plan.is_complete() {
            return Ok(());
        }
        Err(Error::UnresolvedMembers {
            pair: plan.pair.to_string(),
            members: plan.unresolved.iter().map(|m| m.to_string()).collect(),
        })
    }

    /// Run `hook` after every `S -> D` mapping, nested ones included
    ///
    /// Replaces any hook registered earlier for the same pair.
    pub fn register_hook<S, D, F>(&self, hook: F)
    where
        S: Mappable,
        D: Mappable,
        F: Fn(&S, &mut D) + Send + Sync + 'static,
    {
        self.core
            .hooks
            .insert(TypePair::of::<S, D>(), Arc::new(TypedHook::new(hook)));
    }

    /// Drop every cached converter and reset the statistics
    pub fn clear_cache(&self) {
        self.core.cache.clear();
    }

    /// Converter cache statistics
    pub fn stats(&self) -> CacheStats {
        self.core.cache.stats()
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Mapper::from_parts(MapperConfig::default(), Arc::new(ShapeDecorations))
    }
}

fn downcast<D: Mappable>(instance: Box<dyn Any + Send + Sync>) -> Result<D> {
    instance
        .downcast::<D>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::TypeMismatch {
            expected: TypeKey::of::<D>().name().to_string(),
            got: "converter output".to_string(),
        })
}
