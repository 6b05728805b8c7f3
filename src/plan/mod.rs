//! # Mapping plans
//!
//! A [`MappingPlan`] is the inspectable result of analysing one
//! (source, destination) pair: how the destination is constructed, which
//! destination slot reads from which source accessor, and with which
//! conversion. It is plain data; [`CompiledConverter`] turns it into closures.
//!
//! ```text
//! Order -> OrderDto (default)
//!   id <- id [assign]
//!   customer_name <- customer?.name [assign]
//!   status <- status [enum-to-int]
//!   ignored: audit_log
//!   unresolved: legacy_code
//! ```

pub mod builder;
pub mod compile;

pub use builder::{select_conversion, PlanBuilder};
pub use compile::CompiledConverter;

use std::fmt;

use crate::types::{SeqKind, TypeKey, TypePair};

/// Conversion applied to a source value before it is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionKind {
    /// Identical declared types; object references keep their identity
    Assign,
    /// Distinct object types; mapped recursively into a fresh instance
    MapObject {
        /// Destination object type
        target: TypeKey,
    },
    /// Textual rendering; absent renders as the empty string
    Render,
    /// Enum to its underlying integral value
    EnumToInt,
    /// `Option<T>` to `T`; absent becomes the zero value
    Unwrap,
    /// `T` to `Option<T>`
    Wrap,
    /// Element-wise conversion between sequences
    MapSequence {
        /// Conversion applied to every element
        element: Box<ConversionKind>,
        /// Destination sequence flavour
        target: SeqKind,
    },
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConversionKind::Assign => write!(f, "assign"),
            ConversionKind::MapObject { target } => write!(f, "map-object {}", target),
            ConversionKind::Render => write!(f, "render"),
            ConversionKind::EnumToInt => write!(f, "enum-to-int"),
            ConversionKind::Unwrap => write!(f, "unwrap"),
            ConversionKind::Wrap => write!(f, "wrap"),
            ConversionKind::MapSequence { element, target } => {
                let kind = match target {
                    SeqKind::List => "list",
                    SeqKind::Array => "array",
                };
                write!(f, "map-{} of {}", kind, element)
            }
        }
    }
}

/// Where a destination slot reads its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAccessor {
    /// A member of the source type
    Member {
        /// Index into the source descriptor's members
        index: usize,
        /// Member name
        name: &'static str,
    },
    /// A member of an object-typed source member, read through a null check
    Flattened {
        /// Index of the object-typed source member
        outer: usize,
        /// Its name
        outer_name: &'static str,
        /// Type of the nested object
        nested: TypeKey,
        /// Index into the nested descriptor's members
        inner: usize,
        /// Nested member name
        inner_name: &'static str,
    },
}

impl fmt::Display for SourceAccessor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceAccessor::Member { name, .. } => f.write_str(name),
            SourceAccessor::Flattened {
                outer_name,
                inner_name,
                ..
            } => write!(f, "{}?.{}", outer_name, inner_name),
        }
    }
}

/// One resolved destination slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Destination member index, or constructor parameter index
    pub slot: usize,
    /// Destination member or parameter name
    pub name: &'static str,
    /// Source of the value
    pub accessor: SourceAccessor,
    /// Conversion applied on the way
    pub conversion: ConversionKind,
}

/// How the destination instance comes into existence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construction {
    /// No-argument initializer
    Default,
    /// Constructor call
    Constructor {
        /// Index into the destination's constructors
        index: usize,
        /// One entry per parameter; `None` passes the zero value
        arguments: Vec<Option<PlanEntry>>,
    },
}

/// Analysis result for one type pair
#[derive(Debug, Clone)]
pub struct MappingPlan {
    /// Pair this plan maps
    pub pair: TypePair,
    /// Construction strategy
    pub construction: Construction,
    /// Member assignments, in destination declaration order
    pub entries: Vec<PlanEntry>,
    /// Destination members skipped by decoration
    pub ignored: Vec<&'static str>,
    /// Destination members (or parameters) with no usable source
    pub unresolved: Vec<&'static str>,
}

impl MappingPlan {
    /// True when every destination member found a source
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl fmt::Display for MappingPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.construction {
            Construction::Default => writeln!(f, "{} (default)", self.pair)?,
            Construction::Constructor { index, arguments } => {
                writeln!(f, "{} (constructor #{})", self.pair, index)?;
                for (position, argument) in arguments.iter().enumerate() {
                    match argument {
                        Some(entry) => writeln!(
                            f,
                            "  arg {} {} <- {} [{}]",
                            position, entry.name, entry.accessor, entry.conversion
                        )?,
                        None => writeln!(f, "  arg {} <- zero", position)?,
                    }
                }
            }
        }
        for entry in &self.entries {
            writeln!(f, "  {} <- {} [{}]", entry.name, entry.accessor, entry.conversion)?;
        }
        if !self.ignored.is_empty() {
            writeln!(f, "  ignored: {}", self.ignored.join(", "))?;
        }
        if !self.unresolved.is_empty() {
            writeln!(f, "  unresolved: {}", self.unresolved.join(", "))?;
        }
        Ok(())
    }
}
