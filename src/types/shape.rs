//! Self-registered type shapes
//!
//! A [`TypeShape`] is what a type tells the mapper about itself: its members
//! (with plain `fn` accessors), how to build an empty instance, and which
//! constructors exist. `mappable!` writes these for ordinary structs.

use std::any::Any;

use super::TypeRef;
use crate::runtime::Value;

/// Reads one member from an instance of the owning type
pub type Getter = fn(&dyn Any) -> Value;

/// Writes one member; `Value::Null` writes the member's zero value
pub type Setter = fn(&mut dyn Any, Value);

/// No-argument initializer
pub type Initializer = fn() -> Box<dyn Any + Send + Sync>;

/// Constructor body; receives one value per declared parameter, in order
pub type Builder = fn(Vec<Value>) -> Box<dyn Any + Send + Sync>;

/// A type that can take part in mapping
pub trait Mappable: Any + Send + Sync + Sized {
    /// Describe this type's members and construction options
    fn shape() -> TypeShape;
}

/// Marker attached to a member declaration (`#[ignore]`, `#[from(name)]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker name
    pub name: &'static str,
    /// Optional argument
    pub argument: Option<&'static str>,
}

/// One member of a registered type
#[derive(Debug, Clone)]
pub struct MemberShape {
    /// Member name as declared
    pub name: &'static str,
    /// Declared type
    pub ty: TypeRef,
    /// Read accessor (`None` for write-only members)
    pub getter: Option<Getter>,
    /// Write accessor (`None` for read-only members)
    pub setter: Option<Setter>,
    /// Member addressed by an index argument; never mapped
    pub indexed: bool,
    /// Declaration markers, interpreted by the decoration capability
    pub markers: Vec<Marker>,
}

impl MemberShape {
    /// Member with no accessors yet
    pub fn new(name: &'static str, ty: TypeRef) -> Self {
        MemberShape {
            name,
            ty,
            getter: None,
            setter: None,
            indexed: false,
            markers: Vec::new(),
        }
    }

    /// Attach a read accessor
    pub fn getter(mut self, getter: Getter) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Attach a write accessor
    pub fn setter(mut self, setter: Setter) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Mark as an indexed member
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Attach a declaration marker
    pub fn marker(mut self, name: &'static str, argument: Option<&'static str>) -> Self {
        self.markers.push(Marker { name, argument });
        self
    }

    /// Look up a marker by name
    pub fn find_marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }
}

/// Constructor parameter
#[derive(Debug, Clone)]
pub struct ParamShape {
    /// Parameter name, bound to source members by name
    pub name: &'static str,
    /// Declared type
    pub ty: TypeRef,
}

/// A constructor taking named parameters
#[derive(Debug, Clone)]
pub struct ConstructorShape {
    /// Parameters in call order
    pub params: Vec<ParamShape>,
    /// Constructor body
    pub build: Builder,
}

impl ConstructorShape {
    /// Constructor with no parameters declared yet
    pub fn new(build: Builder) -> Self {
        ConstructorShape {
            params: Vec::new(),
            build,
        }
    }

    /// Append a parameter
    pub fn param(mut self, name: &'static str, ty: TypeRef) -> Self {
        self.params.push(ParamShape { name, ty });
        self
    }
}

/// Everything a type registers about itself
#[derive(Debug, Clone)]
pub struct TypeShape {
    /// Type name
    pub name: &'static str,
    /// Members in declaration order
    pub members: Vec<MemberShape>,
    /// No-argument initializer, when the type has one
    pub initializer: Option<Initializer>,
    /// Constructors
    pub constructors: Vec<ConstructorShape>,
}

impl TypeShape {
    /// Empty shape
    pub fn new(name: &'static str) -> Self {
        TypeShape {
            name,
            members: Vec::new(),
            initializer: None,
            constructors: Vec::new(),
        }
    }

    /// Register the no-argument initializer
    pub fn initializer(mut self, init: Initializer) -> Self {
        self.initializer = Some(init);
        self
    }

    /// Register a constructor
    pub fn constructor(mut self, ctor: ConstructorShape) -> Self {
        self.constructors.push(ctor);
        self
    }

    /// Register a member
    pub fn member(mut self, member: MemberShape) -> Self {
        self.members.push(member);
        self
    }
}
