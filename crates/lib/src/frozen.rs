//! The immutable, hashable mapping.
//!
//! A [`FrozenMapping`] exposes the same read surface as [`Mapping`] but never
//! changes after construction. Its hash is computed from the key-sorted entries
//! the first time it is needed and cached beside the entries, never among
//! them, so the cache cannot show up in keys, rendering or persisted payloads.
//!
//! Mutators exist so that code written against either type fails loudly
//! instead of silently diverging; each of them returns
//! [`MappingError::ImmutableWrite`].

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, BitOr, BitOrAssign},
    sync::{Arc, OnceLock},
};

use indexmap::IndexMap;

use crate::{
    AttrMap, Class, Entries, Mapping, MappingError, Value,
    attr::FROZEN_MEMBERS,
    guard::{self, Scope},
    value::{compare_entries, digest_entries, render_entries, sorted},
};

struct FrozenShared {
    class: Class,
    entries: IndexMap<String, Value>,
    hash: OnceLock<u64>,
    /// Some entry reaches a mutable mapping, whose content can still change
    volatile: bool,
}

/// An immutable mapping usable as a `HashMap` key or `HashSet` member.
///
/// Cloning shares the instance. Frozen mappings are `Send + Sync`; the lazily
/// cached hash is idempotent, so concurrent first readers agree on it.
///
/// # Examples
///
/// ```
/// use attrmap::{FrozenMapping, frozen};
/// use std::collections::HashSet;
///
/// let a = frozen!(a = 1, b = 2);
/// let b = frozen!(b = 2, a = 1);
/// assert_eq!(a, b);
/// assert_eq!(a.hash_value(), b.hash_value());
///
/// let set: HashSet<FrozenMapping> = [a].into_iter().collect();
/// assert!(set.contains(&b));
/// assert!(!set.contains(&frozen!(a = 1)));
///
/// assert!(b.insert("c", 3).unwrap_err().is_read_only());
/// ```
#[derive(Clone)]
pub struct FrozenMapping {
    inner: Arc<FrozenShared>,
}

impl FrozenMapping {
    /// Creates a new empty `FrozenMapping`
    pub fn new() -> Self {
        Self::with_class(Class::frozen())
    }

    /// Creates a new empty frozen mapping of the given class
    pub fn with_class(class: Class) -> Self {
        Self::of_class(class, Vec::<(String, Value)>::new())
    }

    /// Builds a frozen mapping of the given class from pairs; later pairs win.
    pub fn of_class<K, V>(class: Class, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entries = IndexMap::new();
        for (key, value) in pairs {
            entries.insert(key.into(), value.into());
        }
        let volatile = entries.values().any(Value::reaches_mutable);
        Self {
            inner: Arc::new(FrozenShared {
                class,
                entries,
                hash: OnceLock::new(),
                volatile,
            }),
        }
    }

    /// Builds a `FrozenMapping` from pairs; later pairs win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::of_class(Class::frozen(), pairs)
    }

    /// Builds a `FrozenMapping` holding the entries of another source.
    pub fn from_entries(source: &(impl Entries + ?Sized)) -> Self {
        Self::from_pairs(source.entries())
    }

    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Returns true if both handles refer to the same instance
    pub fn ptr_eq(&self, other: &FrozenMapping) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.entries.get(key)
    }

    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).cloned().unwrap_or_else(|| default.into())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.inner.entries.keys().cloned().collect()
    }

    /// Values in insertion order
    pub fn values(&self) -> Vec<Value> {
        self.inner.entries.values().cloned().collect()
    }

    /// Borrowing iteration over the entries, in insertion order

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.inner.entries.iter()
    }

    /// Entries in insertion order, as an owned snapshot
    pub fn items(&self) -> Vec<(String, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// The structural hash of the entries, computed once and cached.
    ///
    /// Only content takes part: insertion order and class do not. A frozen
    /// mapping that reaches a mutable mapping hashes its current content on
    /// every call and never caches it.
    pub fn hash_value(&self) -> u64 {
        self.digest().unwrap_or_default()
    }

    /// The cached hash, if it has been computed yet
    pub fn cached_hash(&self) -> Option<u64> {
        self.inner.hash.get().copied()
    }

    /// True if some entry reaches a mutable mapping
    pub(crate) fn is_volatile(&self) -> bool {
        self.inner.volatile
    }

    pub(crate) fn digest(&self) -> Option<u64> {
        if let Some(hash) = self.inner.hash.get() {
            return Some(*hash);
        }
        // A digest taken while another mapping is mid-walk may have cut a
        // cycle through that mapping, so only top-level digests are cached.
        let cacheable = !self.inner.volatile && guard::is_idle(Scope::Digest);
        let digest = digest_entries(self.id(), self.inner.entries.iter())?;
        if cacheable && self.inner.hash.set(digest).is_ok() {
            tracing::trace!(class = %self.class(), hash = digest, "cached frozen mapping hash");
        }
        Some(digest)
    }

    fn read_only<T>(&self) -> Result<T, MappingError> {
        Err(MappingError::ImmutableWrite {
            class: self.class().to_string(),
        })
    }

    /// Always fails: frozen mappings cannot be written
    pub fn insert(
        &self,
        _key: impl Into<String>,
        _value: impl Into<Value>,
    ) -> Result<Option<Value>, MappingError> {
        self.read_only()
    }

    /// Always fails: frozen mappings cannot be written
    pub fn remove(&self, _key: &str) -> Result<Option<Value>, MappingError> {
        self.read_only()
    }

    /// Always fails: frozen mappings cannot be written
    pub fn pop(&self, _key: &str) -> Result<Value, MappingError> {
        self.read_only()
    }

    /// Always fails, even when the key is already present
    pub fn setdefault(
        &self,
        _key: impl Into<String>,
        _default: impl Into<Value>,
    ) -> Result<Value, MappingError> {
        self.read_only()
    }

    /// Always fails: frozen mappings cannot be written
    pub fn update(&self, _other: &(impl Entries + ?Sized)) -> Result<(), MappingError> {
        self.read_only()
    }

    /// Always fails: frozen mappings cannot be written
    pub fn extend<K, V>(&self, _pairs: impl IntoIterator<Item = (K, V)>) -> Result<(), MappingError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.read_only()
    }

    /// Always fails: frozen mappings cannot be written
    pub fn clear(&self) -> Result<(), MappingError> {
        self.read_only()
    }

    /// A new instance of the same class with the same entries
    pub fn copy(&self) -> FrozenMapping {
        Self::of_class(self.class().clone(), self.items())
    }

    /// A new instance of this mapping's class holding these entries overlaid
    /// by `other`'s.
    pub fn add(&self, other: &(impl Entries + ?Sized)) -> FrozenMapping {
        let mut entries = self.inner.entries.clone();
        for (key, value) in other.entries() {
            entries.insert(key, value);
        }
        Self::of_class(self.class().clone(), entries)
    }

    /// Alias of [`FrozenMapping::add`]
    pub fn union(&self, other: &(impl Entries + ?Sized)) -> FrozenMapping {
        self.add(other)
    }

    /// Same as [`FrozenMapping::add`]: a frozen receiver cannot be updated in
    /// place, so the result is always a new instance.
    pub fn in_place_add(&self, other: &(impl Entries + ?Sized)) -> FrozenMapping {
        self.add(other)
    }

    /// A mutable `Mapping` holding the same entries
    pub fn thaw(&self) -> Mapping {
        Mapping::from_pairs(self.items())
    }
}

impl Default for FrozenMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl Entries for FrozenMapping {
    fn entries(&self) -> Vec<(String, Value)> {
        self.items()
    }

    fn rebuild(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Frozen(FrozenMapping::of_class(self.class().clone(), entries))
    }
}

impl AttrMap for FrozenMapping {
    fn class(&self) -> &Class {
        &self.inner.class
    }

    fn members(&self) -> &'static [&'static str] {
        FROZEN_MEMBERS
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    fn store(&self, _key: &str, _value: Value) -> Result<Option<Value>, MappingError> {
        self.read_only()
    }

    fn erase(&self, _key: &str) -> Result<Option<Value>, MappingError> {
        self.read_only()
    }
}

impl Hash for FrozenMapping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl fmt::Display for FrozenMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_entries(f, self.id(), self.class().name(), || self.items())
    }
}

impl fmt::Debug for FrozenMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for FrozenMapping {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrozenMapping {}

impl PartialEq<Mapping> for FrozenMapping {
    fn eq(&self, other: &Mapping) -> bool {
        other == self
    }
}

impl PartialOrd for FrozenMapping {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrozenMapping {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_entries(
            self.id(),
            &sorted(self.items()),
            other.id(),
            &sorted(other.items()),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FrozenMapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl<M: Entries + ?Sized> Add<&M> for &FrozenMapping {
    type Output = FrozenMapping;

    fn add(self, other: &M) -> FrozenMapping {
        FrozenMapping::add(self, other)
    }
}

impl<M: Entries + ?Sized> Add<&M> for FrozenMapping {
    type Output = FrozenMapping;

    fn add(self, other: &M) -> FrozenMapping {
        FrozenMapping::add(&self, other)
    }
}

/// Rebinds the left-hand side to a new instance; the original is untouched.
impl<M: Entries + ?Sized> AddAssign<&M> for FrozenMapping {
    fn add_assign(&mut self, other: &M) {
        *self = self.in_place_add(other);
    }
}

impl<M: Entries + ?Sized> BitOr<&M> for &FrozenMapping {
    type Output = FrozenMapping;

    fn bitor(self, other: &M) -> FrozenMapping {
        self.union(other)
    }
}

impl<M: Entries + ?Sized> BitOr<&M> for FrozenMapping {
    type Output = FrozenMapping;

    fn bitor(self, other: &M) -> FrozenMapping {
        self.union(other)
    }
}

impl<M: Entries + ?Sized> BitOrAssign<&M> for FrozenMapping {
    fn bitor_assign(&mut self, other: &M) {
        *self = self.union(other);
    }
}
