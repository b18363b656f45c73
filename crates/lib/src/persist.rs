//! Persistence of mapping instances.
//!
//! A mapping is persisted as a [`Reduced`] triple: the class name, which
//! constructor restores it (mutable or frozen), and its logical content. The
//! frozen hash cache is never written; a restored frozen mapping computes it
//! again on first use. Every serde format therefore round-trips mappings with
//! their class and mutability intact, without special-casing them.
//!
//! Mutable mappings also carry an `id` that is unique within one payload. A
//! mapping met again while the same payload is written (a mapping holding
//! itself, or one handle stored twice) is written as `{"ref": id}` instead,
//! and restored as the very same handle.

use std::{cell::RefCell, collections::HashMap, fmt, hash::Hash, thread::LocalKey};

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{Class, FrozenMapping, Mapping, Result, Value};

/// The persisted form of a mapping.
///
/// ```
/// use attrmap::{Class, Mapping, Value};
///
/// let m = Mapping::of_class(Class::new("Config"), [("debug", true)]);
/// let reduced = m.reduce();
/// assert_eq!(reduced.class.name(), "Config");
/// assert!(!reduced.frozen);
///
/// let restored = reduced.restore();
/// assert_eq!(restored, Value::Mapping(m));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduced {
    /// Class name of the persisted instance
    #[serde(rename = "type")]
    pub class: Class,
    /// Whether the frozen constructor restores it
    #[serde(default)]
    pub frozen: bool,
    /// Logical content, in insertion order
    pub content: IndexMap<String, Value>,
}

impl Reduced {
    /// Rebuilds the instance through its pairs-constructor
    pub fn restore(self) -> Value {
        if self.frozen {
            Value::Frozen(FrozenMapping::of_class(self.class, self.content))
        } else {
            Value::Mapping(Mapping::of_class(self.class, self.content))
        }
    }
}

impl Mapping {
    /// The persisted form of this mapping
    pub fn reduce(&self) -> Reduced {
        Reduced {
            class: self.class().clone(),
            frozen: false,
            content: self.items().into_iter().collect(),
        }
    }

    /// Serializes this mapping to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a mapping from [`Mapping::to_json`] output
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FrozenMapping {
    /// The persisted form of this mapping; the hash cache is not part of it
    pub fn reduce(&self) -> Reduced {
        Reduced {
            class: self.class().clone(),
            frozen: true,
            content: self.items().into_iter().collect(),
        }
    }

    /// Serializes this mapping to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a frozen mapping from [`FrozenMapping::to_json`] output
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-thread table shared by every nested call of one serde walk.
#[derive(Default)]
struct Memo<K, V> {
    depth: usize,
    table: HashMap<K, V>,
}

type MemoKey<K, V> = LocalKey<RefCell<Memo<K, V>>>;

thread_local! {
    /// Mapping identity to payload id, while writing
    static WRITTEN: RefCell<Memo<usize, u64>> = RefCell::new(Memo::default());
    /// Payload id to restored handle, while reading
    static RESTORED: RefCell<Memo<u64, Mapping>> = RefCell::new(Memo::default());
}

/// Keeps a memo table alive for the duration of a walk. The outermost
/// session clears the table when it ends.
struct Session<K: 'static, V: 'static> {
    memo: &'static MemoKey<K, V>,
}

impl<K: Eq + Hash + 'static, V: 'static> Session<K, V> {
    fn enter(memo: &'static MemoKey<K, V>) -> Self {
        memo.with(|memo| memo.borrow_mut().depth += 1);
        Self { memo }
    }

    fn with<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        self.memo.with(|memo| f(&mut memo.borrow_mut().table))
    }
}

impl<K: 'static, V: 'static> Drop for Session<K, V> {
    fn drop(&mut self) {
        let _ = self.memo.try_with(|memo| {
            let mut memo = memo.borrow_mut();
            memo.depth = memo.depth.saturating_sub(1);
            if memo.depth == 0 {
                memo.table.clear();
            }
        });
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let session = Session::enter(&WRITTEN);
        let (id, first) = session.with(|ids| {
            let next = ids.len() as u64;
            let id = *ids.entry(self.id()).or_insert(next);
            (id, id == next)
        });

        if !first {
            tracing::trace!(class = %self.class(), id, "wrote mapping back-reference");
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("ref", &id)?;
            return map.end();
        }

        let reduced = self.reduce();
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("type", &reduced.class)?;
        map.serialize_entry("frozen", &reduced.frozen)?;
        map.serialize_entry("id", &id)?;
        map.serialize_entry("content", &reduced.content)?;
        map.end()
    }
}

impl Serialize for FrozenMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Mutable mappings stored twice below a frozen one still share an id
        let _session = Session::enter(&WRITTEN);
        self.reduce().serialize(serializer)
    }
}

/// A restored mapping of either kind
enum Restored {
    Mutable(Mapping),
    Frozen(FrozenMapping),
}

struct RestoreVisitor;

impl<'de> Visitor<'de> for RestoreVisitor {
    type Value = Restored;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a persisted mapping or a mapping reference")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Restored, A::Error> {
        let session = Session::enter(&RESTORED);
        let mut class: Option<Class> = None;
        let mut frozen: Option<bool> = None;
        let mut id: Option<u64> = None;
        let mut reference: Option<u64> = None;
        let mut linked: Option<Mapping> = None;
        let mut content: Option<IndexMap<String, Value>> = None;

        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "type" => class = Some(access.next_value()?),
                "frozen" => frozen = Some(access.next_value()?),
                "id" => id = Some(access.next_value()?),
                "ref" => reference = Some(access.next_value()?),
                "content" => match (&class, frozen) {
                    // The empty handle is registered before its content is
                    // read, so references from inside resolve to it.
                    (Some(class), Some(false)) => {
                        let mapping = Mapping::with_class(class.clone());
                        if let Some(id) = id {
                            session.with(|table| table.insert(id, mapping.clone()));
                        }
                        let entries: IndexMap<String, Value> = access.next_value()?;
                        for (key, value) in entries {
                            mapping.insert(key, value);
                        }
                        linked = Some(mapping);
                    }
                    _ => content = Some(access.next_value()?),
                },
                _ => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }

        if let Some(id) = reference {
            return session
                .with(|table| table.get(&id).cloned())
                .map(Restored::Mutable)
                .ok_or_else(|| de::Error::custom(format!("reference to unknown mapping {id}")));
        }
        if let Some(mapping) = linked {
            return Ok(Restored::Mutable(mapping));
        }

        let class = class.ok_or_else(|| de::Error::missing_field("type"))?;
        let content = content.ok_or_else(|| de::Error::missing_field("content"))?;
        if frozen.unwrap_or(false) {
            return Ok(Restored::Frozen(FrozenMapping::of_class(class, content)));
        }
        let mapping = Mapping::of_class(class, content);
        if let Some(id) = id {
            session.with(|table| table.insert(id, mapping.clone()));
        }
        Ok(Restored::Mutable(mapping))
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match deserializer.deserialize_map(RestoreVisitor)? {
            Restored::Mutable(mapping) => Ok(mapping),
            Restored::Frozen(frozen) => Err(de::Error::custom(format!(
                "expected a mutable mapping, found frozen '{}'",
                frozen.class()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for FrozenMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match deserializer.deserialize_map(RestoreVisitor)? {
            Restored::Frozen(frozen) => Ok(frozen),
            Restored::Mutable(mapping) => Err(de::Error::custom(format!(
                "expected a frozen mapping, found mutable '{}'",
                mapping.class()
            ))),
        }
    }
}
