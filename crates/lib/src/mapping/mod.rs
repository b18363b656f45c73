//! The mutable, attribute-accessible mapping.
//!
//! A [`Mapping`] is a handle to one ordered store of `(key, value)` entries.
//! Cloning the handle aliases the store, the same way binding a second name to
//! an object does; [`Mapping::copy`] creates a new store. Because values may
//! themselves be handles, a mapping can contain itself, and every walk over
//! values (rendering, comparison, hashing, serialization) is cycle-safe.
//!
//! # Usage
//!
//! ```
//! use attrmap::{AttrMap, Mapping, Value, mapping};
//!
//! let m = mapping!(b = 1, a = 2);
//! assert_eq!(m.to_string(), "Mapping(a=2, b=1)");
//!
//! m.set_attr("c", Value::from(3)).unwrap();
//! assert_eq!(m.get("c"), Some(Value::Int(3)));
//!
//! let sum = &m + &mapping!(d = 4);
//! assert_eq!(sum.len(), 4);
//! assert_eq!(m.len(), 3);
//! ```

use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, BitOr, BitOrAssign},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use indexmap::IndexMap;

use crate::{
    AttrMap, Class, Entries, FrozenMapping, MappingError, Value,
    attr::MAPPING_MEMBERS,
    value::{compare_entries, digest_entries, render_entries, sorted},
};


struct Shared {
    class: Class,
    entries: RwLock<IndexMap<String, Value>>,
}

/// An ordered key/value store whose keys are also readable and writable as
/// attributes (see [`AttrMap`]).
///
/// All methods take `&self`: mutation goes through the shared store, so every
/// handle to the same mapping observes it. The store's lock is never held while
/// user-visible recursion happens; methods that read entries hand out owned
/// snapshots.
///
/// # Core Operations
///
/// - **Key access**: `get()`, `insert()`, `remove()`, `pop()`, `setdefault()`
/// - **Bulk**: `update()`, `clear()`, `Extend`
/// - **Combining**: `add()`/`+`, `union()`/`|` build new instances;
///   `in_place_add()`/`+=` mutate this one
/// - **Copying**: `copy()` (shallow, class-preserving), `freeze()`
///
/// # Examples
///
/// ```
/// # use attrmap::{Mapping, mapping};
/// let s = mapping!(x = 1);
/// let alias = s.clone();
/// alias.insert("x", 2);
/// assert_eq!(s.get("x"), Some(2.into()));
/// assert!(s.ptr_eq(&alias));
///
/// let copied = s.copy();
/// assert_eq!(copied, s);
/// assert!(!copied.ptr_eq(&s));
/// ```
#[derive(Clone)]
pub struct Mapping {
    inner: Arc<Shared>,
}

impl Mapping {
    /// Creates a new empty `Mapping`
    pub fn new() -> Self {
        Self::with_class(Class::mapping())
    }

    /// Creates a new empty mapping of the given class
    pub fn with_class(class: Class) -> Self {
        Self::of_class(class, Vec::<(String, Value)>::new())
    }

    /// Builds a mapping of the given class from pairs; later pairs win.
    pub fn of_class<K, V>(class: Class, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entries = IndexMap::new();
        for (key, value) in pairs {
            entries.insert(key.into(), value.into());
        }
        Self {
            inner: Arc::new(Shared {
                class,
                entries: RwLock::new(entries),
            }),
        }
    }

    /// Builds a `Mapping` from pairs; later pairs win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::of_class(Class::mapping(), pairs)
    }

    /// Builds a `Mapping` holding the entries of any other mapping-like source.
    pub fn from_entries(source: &(impl Entries + ?Sized)) -> Self {
        Self::from_pairs(source.entries())
    }

    /// Builder method to set a value and return self
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Returns true if both handles refer to the same store
    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Value>> {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Value>> {
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Gets a value by key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Gets a value by key, or `default` if the key is absent
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Values in insertion order
    pub fn values(&self) -> Vec<Value> {
        self.read().values().cloned().collect()
    }

    /// Entries in insertion order
    pub fn items(&self) -> Vec<(String, Value)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Sets a value, returning the old value if present.
    ///
    /// Overwriting an existing key keeps its position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.write().insert(key.into(), value.into())
    }

    /// Removes a key, keeping the order of the remaining entries
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().shift_remove(key)
    }

    /// Removes a key, failing if it is absent
    pub fn pop(&self, key: &str) -> Result<Value, MappingError> {
        self.remove(key).ok_or_else(|| MappingError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Returns the value for `key`, inserting `default` first if absent
    pub fn setdefault(&self, key: impl Into<String>, default: impl Into<Value>) -> Value {
        self.write()
            .entry(key.into())
            .or_insert_with(|| default.into())
            .clone()
    }

    /// Overlays the entries of `other`; its values win on conflicts.
    pub fn update(&self, other: &(impl Entries + ?Sized)) {
        // Snapshot first: `other` may be this very mapping.
        let entries = other.entries();
        let mut store = self.write();
        for (key, value) in entries {
            store.insert(key, value);
        }
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// A new mapping of the same class with the same entries.
    ///
    /// Shallow: nested mapping values are shared with the original.
    pub fn copy(&self) -> Mapping {
        Self::of_class(self.class().clone(), self.items())
    }

    /// A new instance of this mapping's class holding these entries overlaid
    /// by `other`'s. Neither operand changes.
    pub fn add(&self, other: &(impl Entries + ?Sized)) -> Mapping {
        let result = self.copy();
        result.update(other);
        result
    }

    /// Alias of [`Mapping::add`]
    pub fn union(&self, other: &(impl Entries + ?Sized)) -> Mapping {
        self.add(other)
    }

    /// Overlays `other` onto this mapping and returns this same mapping.
    pub fn in_place_add(&self, other: &(impl Entries + ?Sized)) -> Mapping {
        self.update(other);
        self.clone()
    }

    /// A `FrozenMapping` holding the current entries
    pub fn freeze(&self) -> FrozenMapping {
        FrozenMapping::from_pairs(self.items())
    }

    pub(crate) fn digest(&self) -> Option<u64> {
        let items = self.items();
        digest_entries(self.id(), items.iter().map(|(k, v)| (k, v)))
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl Entries for Mapping {
    fn entries(&self) -> Vec<(String, Value)> {
        self.items()
    }

    fn rebuild(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Mapping(Mapping::of_class(self.class().clone(), entries))
    }
}

impl AttrMap for Mapping {
    fn class(&self) -> &Class {
        &self.inner.class
    }

    fn members(&self) -> &'static [&'static str] {
        MAPPING_MEMBERS
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn store(&self, key: &str, value: Value) -> Result<Option<Value>, MappingError> {
        Ok(self.insert(key, value))
    }

    fn erase(&self, key: &str) -> Result<Option<Value>, MappingError> {
        Ok(self.remove(key))
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_entries(f, self.id(), self.class().name(), || self.items())
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Mapping {}

impl PartialEq<FrozenMapping> for Mapping {
    fn eq(&self, other: &FrozenMapping) -> bool {
        compare_entries(
            self.id(),
            &sorted(self.items()),
            other.id(),
            &sorted(other.items()),
        ) == Ordering::Equal
    }
}

impl PartialOrd for Mapping {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mapping {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_entries(
            self.id(),
            &sorted(self.items()),
            other.id(),
            &sorted(other.items()),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Mapping {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let mut store = self.write();
        for (key, value) in iter {
            store.insert(key.into(), value.into());
        }
    }
}

impl<M: Entries + ?Sized> Add<&M> for &Mapping {
    type Output = Mapping;

    fn add(self, other: &M) -> Mapping {
        Mapping::add(self, other)
    }
}

impl<M: Entries + ?Sized> Add<&M> for Mapping {
    type Output = Mapping;

    fn add(self, other: &M) -> Mapping {
        Mapping::add(&self, other)
    }
}

impl<M: Entries + ?Sized> AddAssign<&M> for Mapping {
    fn add_assign(&mut self, other: &M) {
        self.update(other);
    }
}

impl<M: Entries + ?Sized> BitOr<&M> for &Mapping {
    type Output = Mapping;

    fn bitor(self, other: &M) -> Mapping {
        self.union(other)
    }
}

impl<M: Entries + ?Sized> BitOr<&M> for Mapping {
    type Output = Mapping;

    fn bitor(self, other: &M) -> Mapping {
        self.union(other)
    }
}

impl<M: Entries + ?Sized> BitOrAssign<&M> for Mapping {
    fn bitor_assign(&mut self, other: &M) {
        self.update(other);
    }
}
