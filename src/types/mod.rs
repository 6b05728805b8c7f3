//! # Declared member types
//!
//! Rust has no runtime reflection, so every mappable type registers its own
//! [`TypeShape`] through the [`Mappable`] trait, and every member value type
//! reports its declared [`TypeRef`] through [`Field`]. The plan builder reads
//! nothing else.
//!
//! ```text
//! struct Person { name: String, age: Option<i32>, address: Option<Arc<Address>> }
//!
//! name    -> TypeRef::Text
//! age     -> TypeRef::Optional(Int(I32))
//! address -> TypeRef::Object(TypeKey(Address))   (nullable reference)
//! ```

pub mod field;
pub mod shape;

pub use field::{field_or_zero, Field, Nullable};
pub use shape::{
    Builder, ConstructorShape, Getter, Initializer, Mappable, Marker, MemberShape, ParamShape,
    Setter, TypeShape,
};

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a registered (mappable) type
///
/// Equality and hashing use the `TypeId` only; the name is for display and
/// the shape function is how the reflector reaches the type's members.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    shape: fn() -> TypeShape,
}

impl TypeKey {
    /// Key of a registered type
    pub fn of<T: Mappable>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
            shape: T::shape,
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Display name without the module path
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Produce the registered shape
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of a C-like enum registered with `mappable_enum!`
#[derive(Clone, Copy)]
pub struct EnumKey {
    id: TypeId,
    name: &'static str,
}

impl EnumKey {
    /// Key of an enum type
    pub fn of<T: 'static>() -> Self {
        EnumKey {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// Display name without the module path
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EnumKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EnumKey {}

impl Hash for EnumKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EnumKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EnumKey({})", self.name)
    }
}

/// Integral widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// Pointer-sized signed integer
    Isize,
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// Pointer-sized unsigned integer
    Usize,
}

/// Floating-point widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

/// Sequence flavours
///
/// Arrays (`Box<[T]>`) are materialized from a list after element conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// Growable list (`Vec<T>`)
    List,
    /// Fixed boxed slice (`Box<[T]>`)
    Array,
}

/// Declared type of a member, constructor parameter or sequence element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// Any integral type
    Int(IntKind),
    /// Any floating-point type
    Float(FloatKind),
    /// `String`
    Text,
    /// A registered C-like enum
    Enum(EnumKey),
    /// `Option<T>` over a non-reference type
    Optional(Box<TypeRef>),
    /// Homogeneous sequence
    Sequence {
        /// List or array
        kind: SeqKind,
        /// Element type
        element: Box<TypeRef>,
    },
    /// Nullable reference to a registered type (`Option<Arc<T>>`)
    Object(TypeKey),
}

impl TypeRef {
    /// Optional wrapper around `inner`
    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Optional(Box::new(inner))
    }

    /// Sequence of `element`
    pub fn sequence(kind: SeqKind, element: TypeRef) -> Self {
        TypeRef::Sequence {
            kind,
            element: Box::new(element),
        }
    }

    /// Registered type behind an object reference
    pub fn object_key(&self) -> Option<&TypeKey> {
        match self {
            TypeRef::Object(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeRef::Bool => write!(f, "bool"),
            TypeRef::Char => write!(f, "char"),
            TypeRef::Int(kind) => write!(f, "{}", format!("{:?}", kind).to_lowercase()),
            TypeRef::Float(kind) => write!(f, "{}", format!("{:?}", kind).to_lowercase()),
            TypeRef::Text => write!(f, "String"),
            TypeRef::Enum(key) => write!(f, "{}", key.name()),
            TypeRef::Optional(inner) => write!(f, "Option<{}>", inner),
            TypeRef::Sequence {
                kind: SeqKind::List,
                element,
            } => write!(f, "Vec<{}>", element),
            TypeRef::Sequence {
                kind: SeqKind::Array,
                element,
            } => write!(f, "Box<[{}]>", element),
            TypeRef::Object(key) => write!(f, "Option<Arc<{}>>", key.name()),
        }
    }
}

/// The cache key: (source type, destination type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypePair {
    /// Source type
    pub source: TypeKey,
    /// Destination type
    pub destination: TypeKey,
}

impl TypePair {
    /// Pair two registered type keys
    pub fn new(source: TypeKey, destination: TypeKey) -> Self {
        TypePair {
            source,
            destination,
        }
    }

    /// Pair of two registered types
    pub fn of<S: Mappable, D: Mappable>() -> Self {
        TypePair::new(TypeKey::of::<S>(), TypeKey::of::<D>())
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Strip the module path, keeping generic arguments: `a::b::Probe<7>` -> `Probe<7>`
fn short_type_name(full: &'static str) -> &'static str {
    let generics = full.find('<').unwrap_or(full.len());
    match full[..generics].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
