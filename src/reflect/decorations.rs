//! Member decoration queries
//!
//! The reflector never interprets member markers itself. It asks a
//! [`Decorations`] implementation whether a member is ignored and whether it
//! reads from a differently named source member.

use std::any::TypeId;
use std::collections::HashMap;

use crate::types::{Mappable, MemberShape, TypeKey};

/// Marker that excludes a member from mapping
pub const IGNORE_MARKER: &str = "ignore";

/// Marker naming the source member to read from: `#[from(other_name)]`
pub const FROM_MARKER: &str = "from";

/// Decoration-query capability injected into the reflector
pub trait Decorations: Send + Sync {
    /// Whether `member` of `owner` is excluded from mapping
    fn is_ignored(&self, owner: &TypeKey, member: &MemberShape) -> bool;

    /// Source member name overriding the member's own name
    fn source_name(&self, owner: &TypeKey, member: &MemberShape) -> Option<String>;

    /// Reject malformed declarations; the message becomes a reflection error
    fn check(&self, _owner: &TypeKey, _member: &MemberShape) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Reads the markers declared on each member's shape
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeDecorations;

impl Decorations for ShapeDecorations {
    fn is_ignored(&self, _owner: &TypeKey, member: &MemberShape) -> bool {
        member.find_marker(IGNORE_MARKER).is_some()
    }

    fn source_name(&self, _owner: &TypeKey, member: &MemberShape) -> Option<String> {
        member
            .find_marker(FROM_MARKER)
            .and_then(|m| m.argument)
            .map(str::to_string)
    }

    fn check(&self, _owner: &TypeKey, member: &MemberShape) -> std::result::Result<(), String> {
        for marker in &member.markers {
            match marker.name {
                IGNORE_MARKER => {}
                FROM_MARKER if marker.argument.is_none() => {
                    return Err(format!(
                        "marker `{}` on `{}` needs a source member name",
                        FROM_MARKER, member.name
                    ));
                }
                FROM_MARKER => {}
                other => {
                    return Err(format!("unknown marker `{}` on `{}`", other, member.name));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Decision {
    Ignore,
    Rename(String),
}

/// Programmatic decorations layered over the declared markers
///
/// # Example
/// ```ignore
/// let table = DecorationTable::new()
///     .ignore::<UserDto>("password_hash")
///     .rename::<UserDto>("display_name", "full_name");
/// let mapper = Mapper::with_decorations(MapperConfig::default(), table)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecorationTable {
    decisions: HashMap<(TypeId, String), Decision>,
}

impl DecorationTable {
    /// Empty table; behaves exactly like [`ShapeDecorations`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `member` of `T`
    pub fn ignore<T: Mappable>(mut self, member: &str) -> Self {
        self.decisions
            .insert((TypeId::of::<T>(), member.to_lowercase()), Decision::Ignore);
        self
    }

    /// Read `member` of `T` from the source member `source`
    pub fn rename<T: Mappable>(mut self, member: &str, source: &str) -> Self {
        self.decisions.insert(
            (TypeId::of::<T>(), member.to_lowercase()),
            Decision::Rename(source.to_string()),
        );
        self
    }

    fn lookup(&self, owner: &TypeKey, member: &MemberShape) -> Option<&Decision> {
        self.decisions
            .get(&(owner.id(), member.name.to_lowercase()))
    }
}

impl Decorations for DecorationTable {
    fn is_ignored(&self, owner: &TypeKey, member: &MemberShape) -> bool {
        match self.lookup(owner, member) {
            Some(Decision::Ignore) => true,
            Some(Decision::Rename(_)) => false,
            None => ShapeDecorations.is_ignored(owner, member),
        }
    }

    fn source_name(&self, owner: &TypeKey, member: &MemberShape) -> Option<String> {
        match self.lookup(owner, member) {
            Some(Decision::Rename(source)) => Some(source.clone()),
            Some(Decision::Ignore) => None,
            None => ShapeDecorations.source_name(owner, member),
        }
    }

    fn check(&self, owner: &TypeKey, member: &MemberShape) -> std::result::Result<(), String> {
        ShapeDecorations.check(owner, member)
    }
}
