//! Property maps
//!
//! Flat name -> value views of an instance. Reading collects every readable,
//! non-ignored member under its declared name. Writing looks each writable,
//! non-ignored destination member up by its source name, falling back to its
//! declared name (both case-insensitive), and coerces the runtime value with
//! the same table the plan builder uses.

use std::any::Any;
use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::collection;
use super::context::MapContext;
use super::value::Value;
use crate::error::{Error, Result};
use crate::reflect::TypeDescriptor;
use crate::types::TypeRef;

/// Member name -> value
pub type PropertyMap = HashMap<String, Value>;

pub(crate) fn read_properties(descriptor: &TypeDescriptor, source: &dyn Any) -> PropertyMap {
    descriptor
        .members
        .iter()
        .filter(|m| !m.ignored)
        .filter_map(|m| m.read(source).map(|value| (m.name.to_string(), value)))
        .collect()
}

pub(crate) fn build_from(
    ctx: &MapContext<'_>,
    descriptor: &TypeDescriptor,
    properties: &PropertyMap,
) -> Result<Box<dyn Any + Send + Sync>> {
    let mut bound = HashSet::new();

    let mut instance = match descriptor.initializer {
        Some(init) => init(),
        None => {
            let index = descriptor
                .widest_constructor()
                .ok_or_else(|| Error::NoConstructor {
                    type_name: descriptor.key.name().to_string(),
                })?;
            let ctor = &descriptor.constructors()[index];
            let mut arguments = Vec::with_capacity(ctor.params.len());
            for param in &ctor.params {
                bound.insert(param.name.to_lowercase());
                let value = match lookup(properties, param.name) {
                    Some(raw) => coerce(ctx, raw.clone(), &param.ty)?.unwrap_or(Value::Null),
                    None => Value::Null,
                };
                arguments.push(value);
            }
            (ctor.build)(arguments)
        }
    };

    for member in &descriptor.members {
        let Some(write) = member.setter else {
            continue;
        };
        if member.ignored || bound.contains(&member.name.to_lowercase()) {
            continue;
        }
        // Override name first, then the declared name `read_properties` writes
        let Some(raw) = lookup(properties, member.lookup_name())
            .or_else(|| lookup(properties, member.name))
        else {
            continue;
        };
        // Unconvertible values leave the member untouched
        match coerce(ctx, raw.clone(), &member.ty)? {
            Some(value) => write(&mut *instance, value),
            None => trace!(
                member = member.name,
                value = %raw.type_name(),
                declared = %member.ty,
                "property value not convertible; skipped"
            ),
        }
    }
    Ok(instance)
}

/// Exact key first, then case-insensitive
pub(crate) fn lookup<'p>(properties: &'p PropertyMap, name: &str) -> Option<&'p Value> {
    properties.get(name).or_else(|| {
        properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

/// Coerce a runtime value to a declared type; `None` when no rule applies
pub(crate) fn coerce(ctx: &MapContext<'_>, value: Value, target: &TypeRef) -> Result<Option<Value>> {
    Ok(match (value, target) {
        (Value::Null, _) => Some(Value::Null),
        (value, TypeRef::Optional(inner)) => return coerce(ctx, value, inner),
        (value, TypeRef::Text) => value.render_text().map(Value::Text),
        (Value::Enum(e), TypeRef::Int(_)) => Some(Value::Int(e.discriminant)),
        (Value::Enum(e), TypeRef::Enum(key)) if e.key == *key => Some(Value::Enum(e)),
        (value @ (Value::Int(_) | Value::UInt(_)), TypeRef::Int(_)) => Some(value),
        (value @ Value::Float(_), TypeRef::Float(_)) => Some(value),
        (value @ Value::Bool(_), TypeRef::Bool) => Some(value),
        (value @ Value::Char(_), TypeRef::Char) => Some(value),
        (Value::Object(obj), TypeRef::Object(key)) if obj.key() == key => Some(Value::Object(obj)),
        (Value::Object(obj), TypeRef::Object(key)) => Some(ctx.map_object(&obj, key)?),
        (Value::List(items), TypeRef::Sequence { element, .. }) => {
            Some(Value::List(coerce_elements(ctx, items, element)?))
        }
        _ => None,
    })
}

fn coerce_elements(ctx: &MapContext<'_>, items: Vec<Value>, element: &TypeRef) -> Result<Vec<Value>> {
    if let TypeRef::Object(target) = element {
        let first = items.iter().find_map(Value::as_object).map(|obj| *obj.key());
        if first.as_ref() == Some(target) || first.is_none() {
            return Ok(items);
        }
        return collection::map_values(ctx, items, target);
    }

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(coerce(ctx, item, element)?.unwrap_or(Value::Null));
    }
    Ok(out)
}
