//! Error types for Morphic mappers

use thiserror::Error;

/// Mapper errors
///
/// Unsupported member conversions and depth truncation are deliberately *not*
/// errors: the member is left at its zero value instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A scoped mapper was used after `close()`
    ///
    /// **Triggered by:** Calling any mapping operation on a closed [`crate::ScopedMapper`]
    /// **Prevention:** Keep the instance alive for as long as it is used
    #[error("Mapper instance has been closed")]
    Disposed,

    /// A registered type shape could not be turned into a descriptor
    ///
    /// **Triggered by:** Duplicate member names, unknown member markers
    /// **Example:** `mappable!(User { #[ignroe] name: String })`
    #[error("Reflection error on {type_name}: {reason}")]
    Reflection {
        /// Type whose shape is malformed
        type_name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Destination has neither a default initializer nor a constructor
    #[error("No usable constructor for {type_name}")]
    NoConstructor {
        /// Destination type name
        type_name: String,
    },

    /// Validation found destination members with no source
    ///
    /// **Triggered by:** [`crate::Mapper::validate`] only; plain mapping leaves
    /// unresolved members at their zero value
    #[error("Unresolved members mapping {pair}: {}", members.join(", "))]
    UnresolvedMembers {
        /// Type pair being validated
        pair: String,
        /// Destination members left without a source
        members: Vec<String>,
    },

    /// A compiled converter produced a value of an unexpected type
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// Configuration rejected by `MapperConfig::validate` or failed to parse
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a reflection error for a type
    pub fn reflection(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Reflection {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

/// Result type for Morphic operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_lists_members() {
        let err = Error::UnresolvedMembers {
            pair: "Order -> OrderDto".to_string(),
            members: vec!["total".to_string(), "customer_name".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unresolved members mapping Order -> OrderDto: total, customer_name"
        );
    }
}
