//! Results of attribute-style reads.
//!
//! Reading an attribute resolves to the stored value when the name is a key,
//! and otherwise to one of the type's own members. Keys always win, so data can
//! shadow a member name; removing the key makes the member visible again.

use std::fmt;

use crate::{Class, Value};

/// Members every mapping type exposes.
pub(crate) const MAPPING_MEMBERS: &[&str] = &[
    "add",
    "clear",
    "contains_key",
    "copy",
    "del_attr",
    "del_key",
    "extend",
    "freeze",
    "get",
    "get_attr",
    "get_key",
    "get_or",
    "in_place_add",
    "insert",
    "is_empty",
    "items",
    "keys",
    "len",
    "pop",
    "reduce",
    "remove",
    "set_attr",
    "set_key",
    "setdefault",
    "to_json",
    "union",
    "update",
    "values",
];

/// Members of frozen mappings; the mutators are still members, they just fail.
pub(crate) const FROZEN_MEMBERS: &[&str] = &[
    "add",
    "cached_hash",
    "clear",
    "contains_key",
    "copy",
    "del_attr",
    "del_key",
    "extend",
    "get",
    "get_attr",
    "get_key",
    "get_or",
    "hash_value",
    "in_place_add",
    "insert",
    "is_empty",
    "items",
    "keys",
    "len",
    "pop",
    "reduce",
    "remove",
    "set_attr",
    "set_key",
    "setdefault",
    "thaw",
    "to_json",
    "union",
    "update",
    "values",
];

/// A built-in member found by an attribute read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    name: &'static str,
    class: Class,
}

impl Member {
    pub(crate) fn new(name: &'static str, class: Class) -> Self {
        Self { name, class }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Class of the instance the member was read from
    pub fn class(&self) -> &Class {
        &self.class
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in method {} of {} object>", self.name, self.class)
    }
}

/// The outcome of [`AttrMap::get_attr`](crate::AttrMap::get_attr).
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// The name is a stored key
    Value(Value),
    /// The name is not a key but names a built-in member
    Member(Member),
}

impl Attr {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Attr::Value(value) => Some(value),
            Attr::Member(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Attr::Value(value) => Some(value),
            Attr::Member(_) => None,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Attr::Member(_))
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Value(value) => write!(f, "{value}"),
            Attr::Member(member) => write!(f, "{member}"),
        }
    }
}

impl PartialEq<Value> for Attr {
    fn eq(&self, other: &Value) -> bool {
        self.value() == Some(other)
    }
}

impl PartialEq<i64> for Attr {
    fn eq(&self, other: &i64) -> bool {
        self.value().is_some_and(|value| value == other)
    }
}

impl PartialEq<&str> for Attr {
    fn eq(&self, other: &&str) -> bool {
        self.value().is_some_and(|value| value == other)
    }
}
