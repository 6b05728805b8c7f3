use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::types::{EnumKey, Mappable, TypeKey};

/// Runtime value of one member
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    /// Absent value (`None`, null reference)
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer of any width
    Int(i64),
    /// Unsigned integer of any width
    UInt(u64),
    /// Floating-point value of any width
    Float(f64),
    /// Character value
    Char(char),
    /// Text value
    Text(String),
    /// Variant of a registered C-like enum
    Enum(EnumValue),

    // Composites
    /// Sequence elements (lists and arrays alike)
    List(Vec<Value>),
    /// Shared reference to a registered type; compared by identity
    Object(ObjectRef),
}

/// An enum variant with its underlying discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// Enum type
    pub key: EnumKey,
    /// Variant name
    pub variant: &'static str,
    /// Underlying numeric value
    pub discriminant: i64,
}

/// Shared, type-erased reference to an instance of a registered type
#[derive(Clone)]
pub struct ObjectRef {
    key: TypeKey,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Wrap a shared instance
    pub fn new<T: Mappable>(inner: Arc<T>) -> Self {
        ObjectRef {
            key: TypeKey::of::<T>(),
            inner,
        }
    }

    /// Wrap an already type-erased instance whose runtime type is `key`
    pub(crate) fn from_parts(key: TypeKey, inner: Arc<dyn Any + Send + Sync>) -> Self {
        ObjectRef { key, inner }
    }

    /// Runtime type of the referenced instance
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Borrow the instance
    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        &*self.inner
    }

    /// Recover the typed `Arc`; `None` when the runtime type differs
    pub fn downcast<T: Mappable>(self) -> Option<Arc<T>> {
        self.inner.downcast::<T>().ok()
    }

    /// Whether two references point at the same instance
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{} @ {:p}>", self.key.name(), Arc::as_ptr(&self.inner))
    }
}

impl Value {
    /// Returns the type name as a string
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::UInt(_) => "uint".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Text(_) => "text".to_string(),
            Value::Enum(e) => e.key.name().to_string(),
            Value::List(_) => "list".to_string(),
            Value::Object(obj) => obj.key().name().to_string(),
        }
    }

    /// True for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the object reference, if this is one
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Textual rendering used by the text coercion; `None` for `Null`
    ///
    /// Enums render as their variant name, objects as their type name.
    pub fn render_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Enum(e) => Some(e.variant.to_string()),
            Value::Object(obj) => Some(obj.key().name().to_string()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Char(c) => write!(f, "{}", c),
            Value::Text(s) => write!(f, "{}", s),
            Value::Enum(e) => write!(f, "{}", e.variant),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, val) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => write!(f, "<{}>", obj.key().name()),
        }
    }
}

// Objects compare by identity, everything else structurally
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
