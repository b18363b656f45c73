//! Concrete type names carried by mapping instances.
//!
//! Every mapping knows the name of the type it was created as. Operations that
//! produce a "new instance of the same type" (copy, add, merge, restore) carry
//! the class over, which is how named subtypes such as `FooMapping` survive
//! those operations without a Rust type per subtype.

use std::{fmt, sync::Arc};

/// Class name of the base mutable mapping.
pub const MAPPING: &str = "Mapping";

/// Class name of the base frozen mapping.
pub const FROZEN_MAPPING: &str = "FrozenMapping";

/// Class name of records built from an unnamed [`Schema`](crate::Schema).
pub const NAMED_MAPPING: &str = "NamedMapping";

/// The concrete type name of a mapping instance.
///
/// Cheap to clone; equality compares the name.
///
/// ```
/// use attrmap::{Class, Mapping};
///
/// let m = Mapping::with_class(Class::new("Config"));
/// assert_eq!(m.to_string(), "Config()");
/// assert_eq!(m.copy().class().name(), "Config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Class(Arc<str>);

impl Class {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The `Mapping` base class
    pub fn mapping() -> Self {
        Self::new(MAPPING)
    }

    /// The `FrozenMapping` base class
    pub fn frozen() -> Self {
        Self::new(FROZEN_MAPPING)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Class {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Class {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Class {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
