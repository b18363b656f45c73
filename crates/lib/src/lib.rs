//!
//! attrmap: ordered maps whose keys double as attributes.
//!
//! ## Core Concepts
//!
//! * **Mappings (`Mapping`)**: A shared handle to an ordered key/value store. Keys are readable and
//!   writable both as keys and as attributes through [`AttrMap`]; both views hit the same store.
//! * **Frozen mappings (`FrozenMapping`)**: The immutable counterpart. Every write fails, the
//!   structural hash is cached, and instances can be `HashMap` keys or `HashSet` members.
//! * **Values (`Value`)**: What entries hold. Mapping values are handles, so a mapping may contain
//!   itself; rendering, comparison, hashing and serialization all stop at cycles.
//! * **Classes (`Class`)**: Every instance carries the name of its concrete type. Copy, add,
//!   merge and persistence preserve it, which is how named subtypes survive those operations.
//! * **Schemas (`Schema`, `NamedMapping`)**: Fixed-field records built from a declared field list.
//! * **Persistence (`Reduced`)**: Instances persist as a `(type, constructor, content)` triple
//!   through any serde format.
//!
//! ```
//! use attrmap::{AttrMap, Value, frozen, mapping, merge};
//!
//! let m = mapping!(b = 1, a = 2);
//! assert_eq!(m.to_string(), "Mapping(a=2, b=1)");
//!
//! m.set_attr("s", Value::from(&m)).unwrap();
//! assert_eq!(m.to_string(), "Mapping(a=2, b=1, s=Mapping(...))");
//!
//! let merged = merge(&[&frozen!(x = 1), &mapping!(y = 2)], &[]);
//! assert_eq!(merged.as_frozen(), Some(&frozen!(x = 1, y = 2)));
//! ```

pub mod attr;
pub mod class;
pub mod errors;
pub mod frozen;
mod guard;
pub mod mapping;
pub mod merge;
pub mod named;
pub mod persist;
pub mod traits;
pub mod value;

pub use attr::{Attr, Member};
pub use class::Class;
pub use errors::MappingError;
pub use frozen::FrozenMapping;
pub use mapping::Mapping;
pub use merge::merge;
pub use named::{Field, NamedMapping, Schema, SchemaBuilder};
pub use persist::Reduced;
pub use traits::{AttrMap, Entries};
pub use value::Value;

/// Result type used throughout the attrmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the attrmap library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from mapping operations
    #[error(transparent)]
    Mapping(errors::MappingError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Mapping(_) => "mapping",
        }
    }

    /// Check if this error indicates a key or attribute was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Mapping(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error was raised by a write to a frozen mapping.
    pub fn is_read_only(&self) -> bool {
        match self {
            Error::Mapping(err) => err.is_read_only(),
            _ => false,
        }
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}

/// Builds a [`Mapping`] from named values.
///
/// ```
/// # use attrmap::mapping;
/// let m = mapping!(x = 1, name = "Alice");
/// assert_eq!(m.keys(), vec!["x", "name"]);
/// assert!(mapping!().is_empty());
/// ```
#[macro_export]
macro_rules! mapping {
    () => {
        $crate::Mapping::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::Mapping::from_pairs([
            $((stringify!($key), $crate::Value::from($value))),+
        ])
    };
}

/// Builds a [`FrozenMapping`] from named values.
///
/// ```
/// # use attrmap::frozen;
/// let f = frozen!(x = 17);
/// assert_eq!(f.to_string(), "FrozenMapping(x=17)");
/// ```
#[macro_export]
macro_rules! frozen {
    () => {
        $crate::FrozenMapping::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::FrozenMapping::from_pairs([
            $((stringify!($key), $crate::Value::from($value))),+
        ])
    };
}
