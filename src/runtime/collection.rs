//! Collection Adapter
//!
//! Maps every element of a sequence with one converter, resolved from the
//! runtime type of the first non-null element. Nulls stay null. An element
//! whose runtime type differs from the first one still goes through that
//! converter; its getters find nothing and the result is an all-zero
//! destination.

use std::any::Any;
use std::sync::Arc;

use super::context::MapContext;
use super::value::{ObjectRef, Value};
use crate::error::Result;
use crate::types::{TypeKey, TypePair};

/// One element: its runtime type and instance, or `None` for null
pub(crate) type Element<'a> = Option<(TypeKey, &'a dyn Any)>;

/// Map each element into a new instance of `target`
///
/// `None` in the output is a null element or a depth refusal.
pub(crate) fn map_each(
    ctx: &MapContext<'_>,
    elements: &[Element<'_>],
    target: &TypeKey,
) -> Result<Vec<Option<Box<dyn Any + Send + Sync>>>> {
    let mut out = Vec::with_capacity(elements.len());
    let Some((first, _)) = elements.iter().flatten().next() else {
        out.resize_with(elements.len(), || None);
        return Ok(out);
    };

    let pair = TypePair::new(*first, *target);
    let converter = ctx.converter(pair)?;

    for element in elements {
        let mapped = match element {
            Some((_, source)) => match ctx.enter(&pair) {
                Some(_scope) => Some(ctx.apply(&converter, *source)?),
                None => None,
            },
            None => None,
        };
        out.push(mapped);
    }
    Ok(out)
}

/// [`map_each`] over dynamic values; non-object elements count as null
pub(crate) fn map_values(
    ctx: &MapContext<'_>,
    items: Vec<Value>,
    target: &TypeKey,
) -> Result<Vec<Value>> {
    let elements: Vec<Element<'_>> = items
        .iter()
        .map(|item| {
            item.as_object()
                .map(|obj| (*obj.key(), obj.as_any() as &dyn Any))
        })
        .collect();

    let mapped = map_each(ctx, &elements, target)?;
    Ok(mapped
        .into_iter()
        .map(|item| match item {
            Some(instance) => Value::Object(ObjectRef::from_parts(*target, Arc::from(instance))),
            None => Value::Null,
        })
        .collect())
}
