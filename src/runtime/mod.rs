//! Mapping runtime: values, depth tracking, per-call context and the mapper

pub(crate) mod collection;
mod context;
pub mod depth;
mod hooks;
mod mapper;
mod property_map;
mod value;

pub use context::MapContext;
pub use depth::{DepthGuard, DepthScope};
pub use hooks::MappingHook;
pub use mapper::Mapper;
pub use property_map::PropertyMap;
pub use value::{EnumValue, ObjectRef, Value};
