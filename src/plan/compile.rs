//! Compiled Converter
//!
//! Every plan entry becomes a reader closure (getter fn pointers plus the
//! conversion) and a setter fn pointer. Nothing is looked up by name at call
//! time; nested object types are resolved through the context's cache.

use std::any::Any;
use std::sync::Arc;

use super::{Construction, ConversionKind, MappingPlan, PlanEntry, SourceAccessor};
use crate::error::{Error, Result};
use crate::reflect::{Reflector, TypeDescriptor};
use crate::runtime::collection;
use crate::runtime::{MapContext, Value};
use crate::types::{Builder, Getter, Initializer, Setter, TypePair};

type Reader = Box<dyn Fn(&MapContext<'_>, &dyn Any) -> Result<Value> + Send + Sync>;
type Convert = Arc<dyn Fn(&MapContext<'_>, Value) -> Result<Value> + Send + Sync>;

fn reader<F>(f: F) -> Reader
where
    F: Fn(&MapContext<'_>, &dyn Any) -> Result<Value> + Send + Sync + 'static,
{
    Box::new(f)
}

fn conversion<F>(f: F) -> Convert
where
    F: Fn(&MapContext<'_>, Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

enum Construct {
    Initializer(Initializer),
    Constructor {
        build: Builder,
        arguments: Vec<Option<Reader>>,
    },
}

struct Slot {
    read: Reader,
    write: Setter,
}

/// Executable form of a [`MappingPlan`]
///
/// Immutable and `Send + Sync`; shared between threads as `Arc<CompiledConverter>`.
pub struct CompiledConverter {
    pair: TypePair,
    construct: Construct,
    slots: Vec<Slot>,
}

impl CompiledConverter {
    /// Compile a plan against the descriptors it was built from
    pub fn compile(plan: &MappingPlan, reflector: &Reflector) -> Result<Self> {
        let source = reflector.describe(&plan.pair.source)?;
        let destination = reflector.describe(&plan.pair.destination)?;

        let construct = match &plan.construction {
            Construction::Default => {
                let init = destination.initializer.ok_or_else(|| Error::NoConstructor {
                    type_name: destination.key.name().to_string(),
                })?;
                Construct::Initializer(init)
            }
            Construction::Constructor { index, arguments } => {
                let ctor = destination.constructors().get(*index).ok_or_else(|| {
                    Error::reflection(destination.key.name(), format!("no constructor #{}", index))
                })?;
                let mut readers = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    readers.push(match argument {
                        Some(entry) => Some(compile_reader(entry, &source, reflector)?),
                        None => None,
                    });
                }
                Construct::Constructor {
                    build: ctor.build,
                    arguments: readers,
                }
            }
        };

        let mut slots = Vec::with_capacity(plan.entries.len());
        for entry in &plan.entries {
            let write = destination.members[entry.slot].setter.ok_or_else(|| {
                Error::reflection(
                    destination.key.name(),
                    format!("member `{}` is not writable", entry.name),
                )
            })?;
            slots.push(Slot {
                read: compile_reader(entry, &source, reflector)?,
                write,
            });
        }

        Ok(CompiledConverter {
            pair: plan.pair,
            construct,
            slots,
        })
    }

    /// Pair this converter maps
    pub fn pair(&self) -> &TypePair {
        &self.pair
    }

    /// Number of compiled member assignments
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the converter only constructs
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Build a new destination instance from `source`
    pub fn convert(&self, ctx: &MapContext<'_>, source: &dyn Any) -> Result<Box<dyn Any + Send + Sync>> {
        let mut destination = match &self.construct {
            Construct::Initializer(init) => init(),
            Construct::Constructor { build, arguments } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(match argument {
                        Some(read) => read(ctx, source)?,
                        None => Value::Null,
                    });
                }
                build(values)
            }
        };
        self.populate(ctx, source, &mut *destination)?;
        Ok(destination)
    }

    /// Write every mapped member of `source` into an existing destination
    pub fn populate(&self, ctx: &MapContext<'_>, source: &dyn Any, destination: &mut dyn Any) -> Result<()> {
        for slot in &self.slots {
            let value = (slot.read)(ctx, source)?;
            (slot.write)(destination, value);
        }
        Ok(())
    }
}

fn compile_reader(entry: &PlanEntry, source: &TypeDescriptor, reflector: &Reflector) -> Result<Reader> {
    let convert = compile_conversion(&entry.conversion);
    match &entry.accessor {
        SourceAccessor::Member { index, name } => {
            let get = getter_of(source, *index, name)?;
            Ok(reader(move |ctx, src| convert(ctx, get(src))))
        }
        SourceAccessor::Flattened {
            outer,
            outer_name,
            nested,
            inner,
            inner_name,
        } => {
            let get_outer = getter_of(source, *outer, outer_name)?;
            let nested = reflector.describe(nested)?;
            let get_inner = getter_of(&nested, *inner, inner_name)?;
            Ok(reader(move |ctx, src| match get_outer(src) {
                Value::Object(obj) => convert(ctx, get_inner(obj.as_any())),
                _ => convert(ctx, Value::Null),
            }))
        }
    }
}

fn getter_of(descriptor: &TypeDescriptor, index: usize, name: &str) -> Result<Getter> {
    descriptor
        .members
        .get(index)
        .and_then(|m| m.getter)
        .ok_or_else(|| {
            Error::reflection(
                descriptor.key.name(),
                format!("member `{}` is not readable", name),
            )
        })
}

fn compile_conversion(kind: &ConversionKind) -> Convert {
    match kind {
        // Option<T> and T share one runtime representation
        ConversionKind::Assign | ConversionKind::Unwrap | ConversionKind::Wrap => {
            conversion(|_, value| Ok(value))
        }
        ConversionKind::MapObject { target } => {
            let target = *target;
            conversion(move |ctx, value| match value {
                Value::Object(obj) => ctx.map_object(&obj, &target),
                _ => Ok(Value::Null),
            })
        }
        ConversionKind::Render => conversion(|_, value| {
            Ok(Value::Text(value.render_text().unwrap_or_default()))
        }),
        ConversionKind::EnumToInt => conversion(|_, value| {
            Ok(match value {
                Value::Enum(e) => Value::Int(e.discriminant),
                other => other,
            })
        }),
        ConversionKind::MapSequence { element, .. } => match &**element {
            ConversionKind::MapObject { target } => {
                let target = *target;
                conversion(move |ctx, value| match value {
                    Value::List(items) => collection::map_values(ctx, items, &target).map(Value::List),
                    _ => Ok(Value::Null),
                })
            }
            other => {
                let each = compile_conversion(other);
                conversion(move |ctx, value| match value {
                    Value::List(items) => {
                        let mut out = Vec::with_capacity(items.len());
                        for item in items {
                            out.push(each(ctx, item)?);
                        }
                        Ok(Value::List(out))
                    }
                    _ => Ok(Value::Null),
                })
            }
        },
    }
}
