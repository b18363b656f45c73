//! Values stored in mapping entries.
//!
//! `Value` is the dynamic "any" of a mapping entry. Leaf values are plain data;
//! `Mapping` values are shared handles (so a mapping can contain itself) and
//! `Frozen` values are immutable shared mappings.
//!
//! Equality, ordering and hashing are all content based. A mutable mapping and a
//! frozen mapping with the same entries compare equal and hash equal, matching
//! the rule that the class of a mapping never takes part in comparisons.

use std::{
    cmp::Ordering,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    FrozenMapping, Mapping, MappingError,
    guard::{Reentry, Scope},
};

/// Values that can be stored in a mapping.
///
/// # Value Types
///
/// - [`Value::Null`] - Absent/empty value
/// - [`Value::Bool`] - Boolean values
/// - [`Value::Int`] - 64-bit signed integers
/// - [`Value::Text`] - UTF-8 text strings
/// - [`Value::List`] - Ordered sequences of values
/// - [`Value::Mapping`] - A shared handle to a mutable [`Mapping`]
/// - [`Value::Frozen`] - A shared immutable [`FrozenMapping`]
///
/// # Direct Comparisons
///
/// ```
/// # use attrmap::Value;
/// let text = Value::from("hello");
/// let number = Value::Int(42);
///
/// assert!(text == "hello");
/// assert!(number == 42);
/// assert!(42 == number);
/// assert!(!(text == 42));
/// ```
///
/// # Rendering
///
/// `Display` renders a value the way it appears inside a mapping's rendering:
/// text is quoted, nested mappings render as `Class(k=v, ...)`.
///
/// ```
/// # use attrmap::Value;
/// assert_eq!(Value::from("hi").to_string(), "\"hi\"");
/// assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
/// ```
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<Value>),
    Mapping(Mapping),
    Frozen(FrozenMapping),
}

impl Value {
    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for both mutable and frozen mappings
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_) | Value::Frozen(_))
    }

    /// True if this value is, or contains, a mutable mapping. Frozen values
    /// answer from the flag they computed at construction.
    pub(crate) fn reaches_mutable(&self) -> bool {
        match self {
            Value::Mapping(_) => true,
            Value::Frozen(f) => f.is_volatile(),
            Value::List(items) => items.iter().any(Value::reaches_mutable),
            _ => false,
        }
    }

    /// Returns the kind name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Mapping(_) => "mapping",
            Value::Frozen(_) => "frozen mapping",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to view this value as a mutable mapping handle
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to view this value as a frozen mapping
    pub fn as_frozen(&self) -> Option<&FrozenMapping> {
        match self {
            Value::Frozen(f) => Some(f),
            _ => None,
        }
    }

    /// Unwraps a mutable mapping, returning `None` for anything else
    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Unwraps a frozen mapping, returning `None` for anything else
    pub fn into_frozen(self) -> Option<FrozenMapping> {
        match self {
            Value::Frozen(f) => Some(f),
            _ => None,
        }
    }

    /// Kind order used when values of different kinds are compared.
    /// Both mapping kinds share a rank so that equal content compares equal.
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Text(_) => 3,
            Value::List(_) => 4,
            Value::Mapping(_) | Value::Frozen(_) => 5,
        }
    }

    /// Identity and key-sorted entries of a mapping value.
    fn mapping_parts(&self) -> Option<(usize, Vec<(String, Value)>)> {
        match self {
            Value::Mapping(m) => Some((m.id(), sorted(m.items()))),
            Value::Frozen(f) => Some((f.id(), sorted(f.items()))),
            _ => None,
        }
    }
}

pub(crate) fn sorted(mut entries: Vec<(String, Value)>) -> Vec<(String, Value)> {
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Compares two key-sorted entry lists belonging to the mappings `left_id` and
/// `right_id`. A pair already being compared further up the stack is treated
/// as equal, which makes comparison of cyclic structures terminate.
pub(crate) fn compare_entries(
    left_id: usize,
    left: &[(String, Value)],
    right_id: usize,
    right: &[(String, Value)],
) -> Ordering {
    if left_id == right_id {
        return Ordering::Equal;
    }
    let Some(_guard) = Reentry::enter_pair(Scope::Compare, left_id, right_id) else {
        return Ordering::Equal;
    };
    left.iter().cmp(right.iter())
}

/// Content digest over key-sorted entries, `None` if the mapping `id` is
/// already being digested on this thread.
pub(crate) fn digest_entries<'a>(
    id: usize,
    entries: impl IntoIterator<Item = (&'a String, &'a Value)>,
) -> Option<u64> {
    let _guard = Reentry::enter(Scope::Digest, id)?;
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = DefaultHasher::new();
    entries.len().hash(&mut hasher);
    for (key, value) in entries {
        key.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    Some(hasher.finish())
}

/// Writes `Class(k1=v1, k2=v2)` with keys sorted ascending, or `Class(...)`
/// when the mapping `id` is already being rendered on this thread.
pub(crate) fn render_entries(
    f: &mut fmt::Formatter<'_>,
    id: usize,
    class: &str,
    entries: impl FnOnce() -> Vec<(String, Value)>,
) -> fmt::Result {
    let Some(_guard) = Reentry::enter(Scope::Render, id) else {
        return write!(f, "{class}(...)");
    };
    write!(f, "{class}(")?;
    for (i, (key, value)) in sorted(entries()).iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}={value}")?;
    }
    write!(f, ")")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            _ => match (self.mapping_parts(), other.mapping_parts()) {
                (Some((left_id, left)), Some((right_id, right))) => {
                    compare_entries(left_id, &left, right_id, &right)
                }
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Text(s) => s.hash(state),
            Value::List(items) => items.hash(state),
            // Mutable and frozen mappings digest the same way so that equal
            // content hashes equal across the two kinds.
            Value::Mapping(m) => m.digest().hash(state),
            Value::Frozen(f) => f.digest().hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Mapping(m) => fmt::Display::fmt(m, f),
            Value::Frozen(frozen) => fmt::Display::fmt(frozen, f),
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl From<&Mapping> for Value {
    fn from(value: &Mapping) -> Self {
        Value::Mapping(value.clone())
    }
}

impl From<FrozenMapping> for Value {
    fn from(value: FrozenMapping) -> Self {
        Value::Frozen(value)
    }
}

impl From<&FrozenMapping> for Value {
    fn from(value: &FrozenMapping) -> Self {
        Value::Frozen(value.clone())
    }
}

fn mismatch(expected: &str, actual: &Value) -> MappingError {
    MappingError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

// TryFrom implementations for typed reads
impl TryFrom<&Value> for i64 {
    type Error = MappingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl TryFrom<&Value> for bool {
    type Error = MappingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl TryFrom<&Value> for String {
    type Error = MappingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = MappingError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_text().ok_or_else(|| mismatch("text", value))
    }
}

impl TryFrom<&Value> for Mapping {
    type Error = MappingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_mapping().cloned().ok_or_else(|| mismatch("mapping", value))
    }
}

impl TryFrom<&Value> for FrozenMapping {
    type Error = MappingError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_frozen()
            .cloned()
            .ok_or_else(|| mismatch("frozen mapping", value))
    }
}

// Comparisons with primitives
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
