//! # Morphic - Structural Object Mapping
//!
//! Converts an instance of one type into an instance of another by matching
//! members by name, applying a fixed set of coercions, and caching a compiled
//! converter per (source, destination) pair so the analysis runs once.
//!
//! ## Features
//!
//! - **Name-based matching** - case-insensitive, with explicit source-name overrides
//! - **Flattening** - `address_city` reads `address.city`, null-safe
//! - **Coercions** - text rendering, enum to integer, optional wrap/unwrap,
//!   element-wise sequences, recursive object mapping
//! - **Bounded recursion** - a per-call depth guard truncates cycles
//! - **Two cache policies** - unbounded, or LRU with lazy slack eviction
//! - **Thread-safe** - all entry points are `Send + Sync`; no locks on the read path
//! - **Zero unsafe code**
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use morphic::{mappable, Mapper, MapperConfig};
//!
//! #[derive(Default)]
//! struct Address {
//!     city: String,
//! }
//! mappable!(Address { city: String });
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//!     address: Option<Arc<Address>>,
//! }
//! mappable!(Person {
//!     name: String,
//!     age: Option<i32>,
//!     address: Option<Arc<Address>>,
//! });
//!
//! #[derive(Default)]
//! struct PersonDto {
//!     name: String,
//!     age: i32,
//!     address_city: String,
//! }
//! mappable!(PersonDto {
//!     name: String,
//!     age: i32,
//!     address_city: String,
//! });
//!
//! # fn main() -> morphic::Result<()> {
//! let mapper = Mapper::new(MapperConfig::default())?;
//! let person = Person {
//!     name: "Ada".to_string(),
//!     age: Some(36),
//!     address: Some(Arc::new(Address { city: "London".to_string() })),
//! };
//!
//! let dto: PersonDto = mapper.map_to(&person)?;
//! assert_eq!(dto.name, "Ada");
//! assert_eq!(dto.age, 36);
//! assert_eq!(dto.address_city, "London");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! TypeShape → Reflector → TypeDescriptor → PlanBuilder → MappingPlan
//!                                                           ↓
//!     MapTo → DepthGuard → MappingCache ←──────── CompiledConverter
//! ```
//!
//! ### Main Components
//!
//! - [`Mappable`] / [`Field`] - self-registered type shapes (see [`mappable!`])
//! - [`Reflector`] - immutable, cached member descriptors
//! - [`PlanBuilder`] / [`MappingPlan`] - inspectable per-pair analysis
//! - [`CompiledConverter`] - the plan as closures
//! - [`MappingCache`] - [`UnboundedCache`] or [`LruCache`]
//! - [`Mapper`] / [`ScopedMapper`] - entry points
//!
//! ## Error Handling
//!
//! Unsupported member conversions and depth truncation are not errors: the
//! member keeps its zero value. Malformed shapes, types without any way to be
//! constructed and use of a closed [`ScopedMapper`] are reported as [`Error`].

#![allow(clippy::new_without_default)]

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
mod macros;

pub mod cache;
pub mod config;
pub mod error;
pub mod plan;
pub mod reflect;
pub mod runtime;
pub mod scoped;
pub mod types;

// Re-export main types
pub use cache::{CacheStats, LruCache, MappingCache, UnboundedCache};
pub use config::{Logger, MapperConfig};
pub use error::{Error, Result};
pub use plan::{CompiledConverter, Construction, ConversionKind, MappingPlan, PlanBuilder, PlanEntry};
pub use reflect::{DecorationTable, Decorations, MemberDescriptor, Reflector, TypeDescriptor};
pub use runtime::{EnumValue, MapContext, Mapper, MappingHook, ObjectRef, PropertyMap, Value};
pub use scoped::ScopedMapper;
pub use types::{
    field_or_zero, ConstructorShape, EnumKey, Field, Mappable, MemberShape, Nullable, TypeKey,
    TypePair, TypeRef, TypeShape,
};
