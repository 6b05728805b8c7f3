//! Mapping Plan Builder

use std::collections::HashSet;

use super::{Construction, ConversionKind, MappingPlan, PlanEntry, SourceAccessor};
use crate::error::{Error, Result};
use crate::reflect::{Reflector, TypeDescriptor};
use crate::types::{TypePair, TypeRef};

/// Pick the conversion from `source` to `destination`, first applicable wins
///
/// Returns `None` when no rule applies; the member is then unresolved.
pub fn select_conversion(source: &TypeRef, destination: &TypeRef) -> Option<ConversionKind> {
    if source == destination {
        return Some(ConversionKind::Assign);
    }
    match (source, destination) {
        (TypeRef::Object(_), TypeRef::Object(target)) => {
            Some(ConversionKind::MapObject { target: *target })
        }
        (_, TypeRef::Text) => Some(ConversionKind::Render),
        (TypeRef::Enum(_), TypeRef::Int(_)) => Some(ConversionKind::EnumToInt),
        (TypeRef::Optional(inner), dst) if **inner == *dst => Some(ConversionKind::Unwrap),
        (src, TypeRef::Optional(inner)) if **inner == *src => Some(ConversionKind::Wrap),
        (
            TypeRef::Sequence {
                element: src_elem, ..
            },
            TypeRef::Sequence {
                kind,
                element: dst_elem,
            },
        ) => select_conversion(src_elem, dst_elem).map(|element| ConversionKind::MapSequence {
            element: Box::new(element),
            target: *kind,
        }),
        _ => None,
    }
}

/// Derives [`MappingPlan`]s from type descriptors
pub struct PlanBuilder<'r> {
    reflector: &'r Reflector,
}

impl<'r> PlanBuilder<'r> {
    /// Builder reading descriptors from `reflector`
    pub fn new(reflector: &'r Reflector) -> Self {
        PlanBuilder { reflector }
    }

    /// Analyse one type pair
    pub fn build(&self, pair: &TypePair) -> Result<MappingPlan> {
        let source = self.reflector.describe(&pair.source)?;
        let destination = self.reflector.describe(&pair.destination)?;

        let mut unresolved = Vec::new();
        let mut bound = HashSet::new();

        let construction = if destination.has_initializer() {
            Construction::Default
        } else {
            let index = destination
                .widest_constructor()
                .ok_or_else(|| Error::NoConstructor {
                    type_name: destination.key.name().to_string(),
                })?;
            let params = &destination.constructors()[index].params;
            let mut arguments = Vec::with_capacity(params.len());
            for (position, param) in params.iter().enumerate() {
                bound.insert(param.name.to_lowercase());
                let resolved = self.resolve(&source, param.name, None, &param.ty)?;
                if resolved.is_none() {
                    unresolved.push(param.name);
                }
                arguments.push(resolved.map(|(accessor, conversion)| PlanEntry {
                    slot: position,
                    name: param.name,
                    accessor,
                    conversion,
                }));
            }
            Construction::Constructor { index, arguments }
        };

        let mut entries = Vec::new();
        let mut ignored = Vec::new();

        for (slot, member) in destination.members.iter().enumerate() {
            if !member.writable() || bound.contains(&member.name.to_lowercase()) {
                continue;
            }
            if member.ignored {
                ignored.push(member.name);
                continue;
            }
            match self.resolve(
                &source,
                member.name,
                member.source_name.as_deref(),
                &member.ty,
            )? {
                Some((accessor, conversion)) => entries.push(PlanEntry {
                    slot,
                    name: member.name,
                    accessor,
                    conversion,
                }),
                None => unresolved.push(member.name),
            }
        }

        Ok(MappingPlan {
            pair: *pair,
            construction,
            entries,
            ignored,
            unresolved,
        })
    }

    /// Resolve one destination slot against the source type
    ///
    /// An explicit source name is authoritative: no direct-name or flattening
    /// fallback is tried when it names nothing usable.
    fn resolve(
        &self,
        source: &TypeDescriptor,
        name: &str,
        source_name: Option<&str>,
        ty: &TypeRef,
    ) -> Result<Option<(SourceAccessor, ConversionKind)>> {
        let lookup = source_name.unwrap_or(name);
        if let Some((index, member)) = source.find_source(lookup) {
            return Ok(select_conversion(&member.ty, ty).map(|conversion| {
                (
                    SourceAccessor::Member {
                        index,
                        name: member.name,
                    },
                    conversion,
                )
            }));
        }
        if source_name.is_some() {
            return Ok(None);
        }
        self.flatten(source, name, ty)
    }

    /// `address_city` <- `address.city`, one level deep
    fn flatten(
        &self,
        source: &TypeDescriptor,
        name: &str,
        ty: &TypeRef,
    ) -> Result<Option<(SourceAccessor, ConversionKind)>> {
        let lowered = name.to_lowercase();
        for (outer, member) in source.members.iter().enumerate() {
            if !member.readable() || member.ignored {
                continue;
            }
            let Some(nested_key) = member.ty.object_key() else {
                continue;
            };
            let prefix = member.name.to_lowercase();
            let Some(rest) = lowered.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let suffix = rest.trim_start_matches('_');
            if suffix.is_empty() {
                continue;
            }

            let nested = self.reflector.describe(nested_key)?;
            if let Some((inner, inner_member)) = nested.find_source(suffix) {
                if let Some(conversion) = select_conversion(&inner_member.ty, ty) {
                    let accessor = SourceAccessor::Flattened {
                        outer,
                        outer_name: member.name,
                        nested: *nested_key,
                        inner,
                        inner_name: inner_member.name,
                    };
                    return Ok(Some((accessor, conversion)));
                }
            }
        }
        Ok(None)
    }
}
