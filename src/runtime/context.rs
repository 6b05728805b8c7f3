use std::any::Any;
use std::sync::Arc;

use super::depth::{DepthGuard, DepthScope};
use super::mapper::MapperCore;
use super::value::{ObjectRef, Value};
use crate::error::Result;
use crate::plan::CompiledConverter;
use crate::types::{TypeKey, TypePair};

/// State of one top-level mapping call
///
/// Carries the depth counter through every converter the call reaches, so
/// nested and recursive mappings share one budget. Created per call; never
/// shared between threads.
pub struct MapContext<'m> {
    core: &'m MapperCore,
    guard: DepthGuard,
}

impl<'m> MapContext<'m> {
    pub(crate) fn new(core: &'m MapperCore) -> Self {
        MapContext {
            core,
            guard: DepthGuard::new(core.config.max_depth),
        }
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.guard.depth()
    }

    /// Enter one level for `pair`; reports and refuses past the maximum
    pub(crate) fn enter(&self, pair: &TypePair) -> Option<DepthScope<'_>> {
        let scope = self.guard.scope();
        if scope.is_none() {
            self.core.report_truncation(pair, self.guard.max());
        }
        scope
    }

    pub(crate) fn converter(&self, pair: TypePair) -> Result<Arc<CompiledConverter>> {
        self.core.converter(pair)
    }

    /// Run a converter and the pair's hook; the caller owns the depth scope
    pub(crate) fn apply(
        &self,
        converter: &CompiledConverter,
        source: &dyn Any,
    ) -> Result<Box<dyn Any + Send + Sync>> {
        let mut destination = converter.convert(self, source)?;
        self.core.after_map(converter.pair(), source, &mut *destination);
        Ok(destination)
    }

    /// Depth check, cache lookup, invoke; `None` when the depth limit refused
    pub(crate) fn map_pair(
        &self,
        pair: TypePair,
        source: &dyn Any,
    ) -> Result<Option<Box<dyn Any + Send + Sync>>> {
        let Some(_scope) = self.enter(&pair) else {
            return Ok(None);
        };
        let converter = self.converter(pair)?;
        self.apply(&converter, source).map(Some)
    }

    /// Map a nested object into a fresh instance of `target`
    pub(crate) fn map_object(&self, source: &ObjectRef, target: &TypeKey) -> Result<Value> {
        let pair = TypePair::new(*source.key(), *target);
        Ok(match self.map_pair(pair, source.as_any())? {
            Some(mapped) => Value::Object(ObjectRef::from_parts(*target, Arc::from(mapped))),
            None => Value::Null,
        })
    }
}
