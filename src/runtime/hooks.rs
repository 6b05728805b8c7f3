//! After-map hooks
//!
//! A hook runs once the compiled converter has filled the destination, for
//! top-level and nested mappings alike. It is the seam where member-level
//! overrides plug in without touching plans.

use std::any::Any;
use std::marker::PhantomData;

use crate::types::Mappable;

/// Callback applied after a pair's converter
pub trait MappingHook: Send + Sync {
    /// Adjust `destination` after it was populated from `source`
    fn after_map(&self, source: &dyn Any, destination: &mut dyn Any);
}

/// Hook from a typed closure
pub(crate) struct TypedHook<S, D, F> {
    hook: F,
    _pair: PhantomData<fn(&S, &mut D)>,
}

impl<S, D, F> TypedHook<S, D, F> {
    pub(crate) fn new(hook: F) -> Self {
        TypedHook {
            hook,
            _pair: PhantomData,
        }
    }
}

impl<S, D, F> MappingHook for TypedHook<S, D, F>
where
    S: Mappable,
    D: Mappable,
    F: Fn(&S, &mut D) + Send + Sync,
{
    fn after_map(&self, source: &dyn Any, destination: &mut dyn Any) {
        if let (Some(source), Some(destination)) =
            (source.downcast_ref::<S>(), destination.downcast_mut::<D>())
        {
            (self.hook)(source, destination)
        }
    }
}
