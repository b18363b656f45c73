//! Core traits shared by the mapping types.
//!
//! - `Entries`: anything that can hand out `(key, value)` pairs and knows how to
//!   construct an instance of its own concrete type from pairs
//! - `AttrMap`: the key/attribute bridge. Key access and attribute access are
//!   paired methods over the same three primitives, so the two views cannot
//!   drift apart

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use indexmap::IndexMap;

use crate::{
    Class, Mapping, MappingError, Value,
    attr::{Attr, Member},
};

/// A source of mapping entries.
///
/// Implemented by the mapping types themselves and by the standard map types,
/// so every operation that folds "another mapping" in (update, add, merge)
/// accepts plain maps and pair lists as well.
///
/// # Examples
///
/// ```
/// use attrmap::{Entries, Mapping};
/// use std::collections::BTreeMap;
///
/// let mut plain = BTreeMap::new();
/// plain.insert("x".to_string(), 1);
///
/// let m = Mapping::from_entries(&plain);
/// assert_eq!(m.entries(), plain.entries());
/// ```
pub trait Entries {
    /// All entries, in iteration order.
    fn entries(&self) -> Vec<(String, Value)>;

    /// The pairs-constructor of this source's concrete type.
    ///
    /// `merge` calls this on its first source to decide the type of the result.
    /// Sources that are not mapping types themselves build a base `Mapping`.
    fn rebuild(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Mapping(Mapping::from_pairs(entries))
    }
}

impl<T: Entries + ?Sized> Entries for &T {
    fn entries(&self) -> Vec<(String, Value)> {
        (**self).entries()
    }

    fn rebuild(&self, entries: Vec<(String, Value)>) -> Value {
        (**self).rebuild(entries)
    }
}

fn collect<'a, K, V>(pairs: impl IntoIterator<Item = (&'a K, &'a V)>) -> Vec<(String, Value)>
where
    K: AsRef<str> + 'a,
    V: Clone + Into<Value> + 'a,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
        .collect()
}

impl<K, V, S> Entries for HashMap<K, V, S>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    fn entries(&self) -> Vec<(String, Value)> {
        collect(self.iter())
    }
}

impl<K, V> Entries for BTreeMap<K, V>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        collect(self.iter())
    }
}

impl<K, V, S> Entries for IndexMap<K, V, S>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    fn entries(&self) -> Vec<(String, Value)> {
        collect(self.iter())
    }
}

impl<K, V> Entries for [(K, V)]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        collect(self.iter().map(|(k, v)| (k, v)))
    }
}

impl<K, V, const N: usize> Entries for [(K, V); N]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.as_slice().entries()
    }
}

impl<K, V> Entries for Vec<(K, V)>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.as_slice().entries()
    }
}

/// Key access and attribute access over one store.
///
/// Implementors provide the three store primitives (`lookup`, `store`,
/// `erase`) plus their class and member table; every accessor below is built
/// on those primitives.
///
/// # Examples
///
/// ```
/// use attrmap::{AttrMap, Mapping, Value};
///
/// let m = Mapping::new();
/// m.set_key("a", Value::from(1)).unwrap();
/// assert_eq!(m.get_attr("a").unwrap(), 1);
///
/// m.set_attr("b", Value::from(2)).unwrap();
/// assert_eq!(m.get_key("b").unwrap(), 2);
///
/// // Not a key, but a member of the type
/// assert!(m.get_attr("copy").unwrap().is_member());
/// ```
pub trait AttrMap: Entries {
    /// The concrete class of this instance
    fn class(&self) -> &Class;

    /// Built-in member names attribute reads fall back to
    fn members(&self) -> &'static [&'static str];

    /// Reads a stored key
    fn lookup(&self, key: &str) -> Option<Value>;

    /// Writes a key, returning the previous value
    fn store(&self, key: &str, value: Value) -> Result<Option<Value>, MappingError>;

    /// Removes a key, returning the removed value if it was present
    fn erase(&self, key: &str) -> Result<Option<Value>, MappingError>;

    /// Membership by key, never by value
    fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn get_key(&self, key: &str) -> Result<Value, MappingError> {
        self.lookup(key).ok_or_else(|| MappingError::KeyNotFound {
            key: key.to_string(),
        })
    }

    fn set_key(&self, key: &str, value: Value) -> Result<Option<Value>, MappingError> {
        self.store(key, value)
    }

    fn del_key(&self, key: &str) -> Result<Value, MappingError> {
        self.erase(key)?.ok_or_else(|| MappingError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Reads `name` as an attribute: the stored key if present, otherwise the
    /// built-in member of that name.
    fn get_attr(&self, name: &str) -> Result<Attr, MappingError> {
        if let Some(value) = self.lookup(name) {
            return Ok(Attr::Value(value));
        }
        match self.members().iter().copied().find(|member| *member == name) {
            Some(member) => Ok(Attr::Member(Member::new(member, self.class().clone()))),
            None => Err(MappingError::AttributeNotFound {
                class: self.class().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Writes `name` as a key. Attribute writes never create anything but keys.
    fn set_attr(&self, name: &str, value: Value) -> Result<(), MappingError> {
        self.store(name, value).map(|_| ())
    }

    fn del_attr(&self, name: &str) -> Result<(), MappingError> {
        match self.erase(name)? {
            Some(_) => Ok(()),
            None => Err(MappingError::AttributeNotFound {
                class: self.class().to_string(),
                name: name.to_string(),
            }),
        }
    }
}
