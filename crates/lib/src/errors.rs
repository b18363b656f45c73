//! Error types for mapping operations.
//!
//! The messages mirror the wording users see when the same misuse happens on
//! any attribute-accessible object: the concrete class name is always part of
//! the message so that errors raised by named subtypes are unambiguous.

use thiserror::Error;

/// Structured error types for mapping operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Attribute read or delete on a name that is neither a key nor a member
    #[error("'{class}' object has no attribute '{name}'")]
    AttributeNotFound { class: String, name: String },

    /// Key read or delete on a key that is not stored
    #[error("key not found: '{key}'")]
    KeyNotFound { key: String },

    /// Any mutation attempted on a frozen mapping
    #[error("'{class}' object attributes are read-only")]
    ImmutableWrite { class: String },

    /// More positional values than the schema has fields
    #[error("{class}() takes {expected} positional values but {given} were given")]
    TooManyPositionalValues {
        class: String,
        expected: usize,
        given: usize,
    },

    /// A field was given both positionally and by name
    #[error("{class}() got multiple values for field '{field}'")]
    ConflictingField { class: String, field: String },

    /// A field name that the schema does not declare
    #[error("'{class}' object has no field '{field}'")]
    UnknownField { class: String, field: String },

    /// A value was read as a kind it does not hold
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl MappingError {
    /// Check if this error reports a missing key or attribute
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MappingError::AttributeNotFound { .. } | MappingError::KeyNotFound { .. }
        )
    }

    /// Check if this error was raised through attribute-style access
    pub fn is_attribute_error(&self) -> bool {
        matches!(
            self,
            MappingError::AttributeNotFound { .. } | MappingError::ImmutableWrite { .. }
        )
    }

    /// Check if this error was raised by a write to a frozen mapping
    pub fn is_read_only(&self) -> bool {
        matches!(self, MappingError::ImmutableWrite { .. })
    }

    /// Check if this error was raised while building a fixed-field record
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            MappingError::TooManyPositionalValues { .. }
                | MappingError::ConflictingField { .. }
                | MappingError::UnknownField { .. }
        )
    }

    /// Check if this error is a type mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(self, MappingError::TypeMismatch { .. })
    }

    /// Get the class name the error refers to, if any
    pub fn class(&self) -> Option<&str> {
        match self {
            MappingError::AttributeNotFound { class, .. }
            | MappingError::ImmutableWrite { class }
            | MappingError::TooManyPositionalValues { class, .. }
            | MappingError::ConflictingField { class, .. }
            | MappingError::UnknownField { class, .. } => Some(class),
            _ => None,
        }
    }
}

// Conversion from MappingError to the main Error type
impl From<MappingError> for crate::Error {
    fn from(err: MappingError) -> Self {
        crate::Error::Mapping(err)
    }
}
