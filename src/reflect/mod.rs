//! # Type Descriptor Reflector
//!
//! Turns a registered [`TypeShape`] into an immutable [`TypeDescriptor`]:
//! the mappable members with their accessors and declared types, plus the
//! ignore / source-name decisions of the injected [`Decorations`].
//!
//! Descriptors are built once per type and shared. Two threads describing the
//! same type at once may both build it; the output is identical and the first
//! insert is kept.

pub mod decorations;

pub use decorations::{DecorationTable, Decorations, ShapeDecorations, FROM_MARKER, IGNORE_MARKER};

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::runtime::Value;
use crate::types::{ConstructorShape, Getter, Initializer, Setter, TypeKey, TypeRef};

/// One mappable member of a type
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    /// Member name as declared
    pub name: &'static str,
    /// Declared type
    pub ty: TypeRef,
    /// Excluded from mapping
    pub ignored: bool,
    /// Explicit source member name, when overridden
    pub source_name: Option<String>,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
}

impl MemberDescriptor {
    /// Has a read accessor
    pub fn readable(&self) -> bool {
        self.getter.is_some()
    }

    /// Has a write accessor
    pub fn writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Name a source member must carry to feed this one
    pub fn lookup_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or(self.name)
    }

    /// Read the member from an instance of the owning type
    pub fn read(&self, instance: &dyn Any) -> Option<Value> {
        self.getter.map(|get| get(instance))
    }
}

/// Everything the plan builder needs to know about one type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Described type
    pub key: TypeKey,
    /// Mappable members in declaration order
    pub members: Vec<MemberDescriptor>,
    pub(crate) initializer: Option<Initializer>,
    pub(crate) constructors: Vec<ConstructorShape>,
}

impl TypeDescriptor {
    /// Case-insensitive member lookup
    pub fn find(&self, name: &str) -> Option<(usize, &MemberDescriptor)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, m)| m.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive lookup among members a mapping may read from
    pub fn find_source(&self, name: &str) -> Option<(usize, &MemberDescriptor)> {
        self.find(name)
            .filter(|(_, m)| m.readable() && !m.ignored)
    }

    /// Has a no-argument initializer
    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }

    /// Declared constructors
    pub fn constructors(&self) -> &[ConstructorShape] {
        &self.constructors
    }

    /// Index of the constructor with the most parameters; first declared wins ties
    pub fn widest_constructor(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, ctor) in self.constructors.iter().enumerate() {
            match best {
                Some(b) if self.constructors[b].params.len() >= ctor.params.len() => {}
                _ => best = Some(index),
            }
        }
        best
    }

    /// Build an instance with every member at its zero value
    pub fn zero_instance(&self) -> Result<Box<dyn Any + Send + Sync>> {
        if let Some(init) = self.initializer {
            return Ok(init());
        }
        let index = self.widest_constructor().ok_or_else(|| Error::NoConstructor {
            type_name: self.key.name().to_string(),
        })?;
        let ctor = &self.constructors[index];
        Ok((ctor.build)(vec![Value::Null; ctor.params.len()]))
    }
}

/// Builds and caches [`TypeDescriptor`]s
pub struct Reflector {
    decorations: Arc<dyn Decorations>,
    descriptors: DashMap<TypeId, Arc<TypeDescriptor>>,
}

impl Reflector {
    /// Reflector with the given decoration capability
    pub fn new(decorations: Arc<dyn Decorations>) -> Self {
        Reflector {
            decorations,
            descriptors: DashMap::new(),
        }
    }

    /// Descriptor for a registered type, built on first use
    pub fn describe(&self, key: &TypeKey) -> Result<Arc<TypeDescriptor>> {
        if let Some(found) = self.descriptors.get(&key.id()) {
            return Ok(found.value().clone());
        }

        let built = Arc::new(self.build(key)?);
        let kept = self
            .descriptors
            .entry(key.id())
            .or_insert(built)
            .value()
            .clone();
        Ok(kept)
    }

    /// Number of described types
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True when nothing has been described yet
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn build(&self, key: &TypeKey) -> Result<TypeDescriptor> {
        let shape = key.shape();
        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(shape.members.len());

        for member in shape.members.iter().filter(|m| !m.indexed) {
            if !seen.insert(member.name.to_lowercase()) {
                return Err(Error::reflection(
                    key.name(),
                    format!("duplicate member `{}`", member.name),
                ));
            }
            self.decorations
                .check(key, member)
                .map_err(|reason| Error::reflection(key.name(), reason))?;

            members.push(MemberDescriptor {
                name: member.name,
                ty: member.ty.clone(),
                ignored: self.decorations.is_ignored(key, member),
                source_name: self.decorations.source_name(key, member),
                getter: member.getter,
                setter: member.setter,
            });
        }

        tracing::trace!(type_name = key.name(), members = members.len(), "described type");

        Ok(TypeDescriptor {
            key: *key,
            members,
            initializer: shape.initializer,
            constructors: shape.constructors,
        })
    }
}

impl Default for Reflector {
    fn default() -> Self {
        Reflector::new(Arc::new(ShapeDecorations))
    }
}
