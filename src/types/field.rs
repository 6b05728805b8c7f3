//! Member value types
//!
//! [`Field`] bridges a concrete member type and the dynamic [`Value`] model.
//! Implementations cover the primitives, `String`, `Vec<T>`, `Box<[T]>` and
//! `Option<T>` for every [`Nullable`] `T`, which includes nullable object
//! references (`Option<Arc<T>>`). Enums get theirs from `mappable_enum!`.

use std::sync::Arc;

use super::{FloatKind, IntKind, Mappable, SeqKind, TypeKey, TypeRef};
use crate::runtime::{ObjectRef, Value};

/// A type usable as a member, constructor parameter or sequence element
pub trait Field: Sized + Send + Sync + 'static {
    /// Declared type
    fn type_ref() -> TypeRef;

    /// Read into the dynamic model
    fn to_value(&self) -> Value;

    /// Convert back; `None` when the value has the wrong shape
    fn from_value(value: Value) -> Option<Self>;

    /// The zero value written for `Value::Null` and unconvertible values
    fn zero() -> Self;
}

/// Read a value into a field, falling back to the zero value
pub fn field_or_zero<T: Field>(value: Value) -> T {
    T::from_value(value).unwrap_or_else(T::zero)
}

macro_rules! signed_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::Int(IntKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(n).ok(),
                        Value::UInt(n) => <$ty>::try_from(n).ok(),
                        _ => None,
                    }
                }

                fn zero() -> Self {
                    0
                }
            }
        )*
    };
}

macro_rules! unsigned_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::Int(IntKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::UInt(*self as u64)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(n).ok(),
                        Value::UInt(n) => <$ty>::try_from(n).ok(),
                        _ => None,
                    }
                }

                fn zero() -> Self {
                    0
                }
            }
        )*
    };
}

signed_field!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
unsigned_field!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl Field for f32 {
    fn type_ref() -> TypeRef {
        TypeRef::Float(FloatKind::F32)
    }

    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f as f32),
            _ => None,
        }
    }

    fn zero() -> Self {
        0.0
    }
}

impl Field for f64 {
    fn type_ref() -> TypeRef {
        TypeRef::Float(FloatKind::F64)
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    fn zero() -> Self {
        0.0
    }
}

impl Field for bool {
    fn type_ref() -> TypeRef {
        TypeRef::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn zero() -> Self {
        false
    }
}

impl Field for char {
    fn type_ref() -> TypeRef {
        TypeRef::Char
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Char(c) => Some(c),
            _ => None,
        }
    }

    fn zero() -> Self {
        '\0'
    }
}

impl Field for String {
    fn type_ref() -> TypeRef {
        TypeRef::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    fn zero() -> Self {
        String::new()
    }
}

/// Types whose `Option<T>` is a field.
///
/// Plain values become `TypeRef::Optional`; `Arc<T>` becomes the nullable
/// object reference `TypeRef::Object`. `mappable_enum!` implements this for
/// registered enums.
pub trait Nullable: Sized + Send + Sync + 'static {
    /// Declared type of `Option<Self>`
    fn optional_type_ref() -> TypeRef;

    /// Read `Option<Self>` into the dynamic model
    fn optional_to_value(this: &Option<Self>) -> Value;

    /// Convert back; `Some(None)` for `Value::Null`
    fn optional_from_value(value: Value) -> Option<Option<Self>>;
}

/// `Nullable::optional_type_ref` for plain value fields
pub fn optional_type_ref<T: Field>() -> TypeRef {
    TypeRef::optional(T::type_ref())
}

/// `Nullable::optional_to_value` for plain value fields
pub fn optional_to_value<T: Field>(this: &Option<T>) -> Value {
    match this {
        Some(inner) => inner.to_value(),
        None => Value::Null,
    }
}

/// `Nullable::optional_from_value` for plain value fields
pub fn optional_from_value<T: Field>(value: Value) -> Option<Option<T>> {
    match value {
        Value::Null => Some(None),
        other => T::from_value(other).map(Some),
    }
}

impl<T: Nullable> Field for Option<T> {
    fn type_ref() -> TypeRef {
        T::optional_type_ref()
    }

    fn to_value(&self) -> Value {
        T::optional_to_value(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        T::optional_from_value(value)
    }

    fn zero() -> Self {
        None
    }
}

macro_rules! nullable_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Nullable for $ty {
                fn optional_type_ref() -> TypeRef {
                    optional_type_ref::<$ty>()
                }

                fn optional_to_value(this: &Option<Self>) -> Value {
                    optional_to_value(this)
                }

                fn optional_from_value(value: Value) -> Option<Option<Self>> {
                    optional_from_value(value)
                }
            }
        )*
    };
}

nullable_value!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String,
);

impl<T: Field> Field for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::sequence(SeqKind::List, T::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Field::to_value).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => Some(items.into_iter().map(field_or_zero).collect()),
            _ => None,
        }
    }

    fn zero() -> Self {
        Vec::new()
    }
}

impl<T: Field> Field for Box<[T]> {
    fn type_ref() -> TypeRef {
        TypeRef::sequence(SeqKind::Array, T::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Field::to_value).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        // Materialize into a list first, then freeze into the array.
        <Vec<T> as Field>::from_value(value).map(Vec::into_boxed_slice)
    }

    fn zero() -> Self {
        Vec::new().into_boxed_slice()
    }
}

impl<T: Mappable> Nullable for Arc<T> {
    fn optional_type_ref() -> TypeRef {
        TypeRef::Object(TypeKey::of::<T>())
    }

    fn optional_to_value(this: &Option<Self>) -> Value {
        match this {
            Some(inner) => Value::Object(ObjectRef::new(inner.clone())),
            None => Value::Null,
        }
    }

    fn optional_from_value(value: Value) -> Option<Option<Self>> {
        match value {
            Value::Null => Some(None),
            Value::Object(obj) => obj.downcast::<T>().map(Some),
            _ => None,
        }
    }
}
