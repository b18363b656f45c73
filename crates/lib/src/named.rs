//! Fixed-field records with attribute access.
//!
//! A [`Schema`] declares an ordered list of fields, each with a default, under
//! a class name. Instances ([`NamedMapping`]) always hold exactly those fields:
//! construction rejects unknown names, and so do writes afterwards.
//!
//! # Usage
//!
//! ```
//! use attrmap::{Schema, Value};
//!
//! let point = Schema::builder("Point")
//!     .field("x")
//!     .field("y")
//!     .field_with_default("label", "origin")
//!     .build();
//!
//! let p = point.instantiate([Value::from(1)], [("y", 2)]).unwrap();
//! assert_eq!(p.to_string(), "Point(label=\"origin\", x=1, y=2)");
//!
//! let err = point.instantiate([], [("z", 3)]).unwrap_err();
//! assert!(err.is_schema_error());
//! ```

use std::{cmp::Ordering, fmt, sync::Arc};

use crate::{
    Class, Entries, FrozenMapping, Mapping, MappingError, Value,
    class::NAMED_MAPPING,
    value::{compare_entries, render_entries, sorted},
};

/// A declared field and its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    default: Value,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// The ordered field list of a fixed-field record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    class: Class,
    fields: Vec<Field>,
}

/// Builder for [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    class: Class,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Declares a field defaulting to null
    pub fn field(self, name: impl Into<String>) -> Self {
        self.field_with_default(name, Value::Null)
    }

    /// Declares a field with a default.
    ///
    /// Redeclaring a field replaces its default and keeps its position.
    pub fn field_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.upsert(Field {
            name: name.into(),
            default: default.into(),
        });
        self
    }

    /// Places the fields of `parent` before the fields declared so far.
    pub fn inherit(mut self, parent: &Schema) -> Self {
        let own = std::mem::replace(&mut self.fields, parent.fields.clone());
        for field in own {
            self.upsert(field);
        }
        self
    }

    pub fn build(self) -> Arc<Schema> {
        Arc::new(Schema {
            class: self.class,
            fields: self.fields,
        })
    }

    fn upsert(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => existing.default = field.default,
            None => self.fields.push(field),
        }
    }
}

impl Schema {
    pub fn builder(class: impl Into<Class>) -> SchemaBuilder {
        SchemaBuilder {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    /// A schema from a comma or whitespace separated list of field names.
    ///
    /// ```
    /// # use attrmap::Schema;
    /// let schema = Schema::parse(None, "foo, bar");
    /// assert_eq!(schema.class().name(), "NamedMapping");
    /// assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["foo", "bar"]);
    /// ```
    pub fn parse(class: Option<&str>, names: &str) -> Arc<Schema> {
        names
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .fold(Schema::builder(class.unwrap_or(NAMED_MAPPING)), |builder, name| {
                builder.field(name)
            })
            .build()
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Index of the named field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Builds a record from positional values (filling fields in declaration
    /// order) and named values. Fields given neither way take their default.
    pub fn instantiate<K, V>(
        self: &Arc<Self>,
        positional: impl IntoIterator<Item = Value>,
        named: impl IntoIterator<Item = (K, V)>,
    ) -> Result<NamedMapping, MappingError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let positional: Vec<Value> = positional.into_iter().collect();
        if positional.len() > self.fields.len() {
            tracing::debug!(class = %self.class, given = positional.len(), "too many positional values");
            return Err(MappingError::TooManyPositionalValues {
                class: self.class.to_string(),
                expected: self.fields.len(),
                given: positional.len(),
            });
        }

        let filled = positional.len();
        let mut values: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
        values.resize(self.fields.len(), None);

        for (name, value) in named {
            let name = name.into();
            let Some(index) = self.position(&name) else {
                tracing::debug!(class = %self.class, field = %name, "unknown field");
                return Err(MappingError::UnknownField {
                    class: self.class.to_string(),
                    field: name,
                });
            };
            if index < filled {
                return Err(MappingError::ConflictingField {
                    class: self.class.to_string(),
                    field: name,
                });
            }
            values[index] = Some(value.into());
        }

        let values = values
            .into_iter()
            .zip(&self.fields)
            .map(|(value, field)| value.unwrap_or_else(|| field.default.clone()))
            .collect();
        Ok(NamedMapping {
            schema: Arc::clone(self),
            values,
        })
    }

    /// A record holding every field's default
    pub fn default_instance(self: &Arc<Self>) -> NamedMapping {
        NamedMapping {
            schema: Arc::clone(self),
            values: self.fields.iter().map(|f| f.default.clone()).collect(),
        }
    }
}

/// A record with the fixed fields of its [`Schema`].
///
/// Unlike [`Mapping`] this is a plain owned value: writes take `&mut self` and
/// cloning copies the field values.
#[derive(Clone)]
pub struct NamedMapping {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl NamedMapping {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn class(&self) -> &Class {
        &self.schema.class
    }

    /// Number of fields, which never changes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schema.field_names()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema.field_names().zip(&self.values)
    }

    pub fn items(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|index| &self.values[index])
    }

    /// Attribute read; names outside the schema are not attributes
    pub fn get_attr(&self, name: &str) -> Result<&Value, MappingError> {
        self.get(name)
            .ok_or_else(|| MappingError::AttributeNotFound {
                class: self.class().to_string(),
                name: name.to_string(),
            })
    }

    /// Writes a field, returning the previous value
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value, MappingError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| MappingError::UnknownField {
                class: self.class().to_string(),
                field: name.to_string(),
            })?;
        Ok(std::mem::replace(&mut self.values[index], value.into()))
    }

    /// Attribute write; names outside the schema are not attributes
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> Result<(), MappingError> {
        match self.set(name, value) {
            Ok(_) => Ok(()),
            Err(MappingError::UnknownField { class, field }) => {
                Err(MappingError::AttributeNotFound { class, name: field })
            }
            Err(err) => Err(err),
        }
    }

    /// A base `Mapping` holding the fields in declaration order
    pub fn to_mapping(&self) -> Mapping {
        Mapping::from_pairs(self.items())
    }

    /// A base `FrozenMapping` holding the fields
    pub fn freeze(&self) -> FrozenMapping {
        FrozenMapping::from_pairs(self.items())
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }
}

impl Entries for NamedMapping {
    fn entries(&self) -> Vec<(String, Value)> {
        self.items()
    }
}

impl fmt::Display for NamedMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_entries(f, self.id(), self.class().name(), || self.items())
    }
}

impl fmt::Debug for NamedMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for NamedMapping {
    fn eq(&self, other: &Self) -> bool {
        compare_entries(
            self.id(),
            &sorted(self.items()),
            other.id(),
            &sorted(other.items()),
        ) == Ordering::Equal
    }
}

impl PartialEq<Mapping> for NamedMapping {
    fn eq(&self, other: &Mapping) -> bool {
        sorted(self.items()) == sorted(other.items())
    }
}

impl PartialEq<NamedMapping> for Mapping {
    fn eq(&self, other: &NamedMapping) -> bool {
        other == self
    }
}

impl PartialEq<FrozenMapping> for NamedMapping {
    fn eq(&self, other: &FrozenMapping) -> bool {
        sorted(self.items()) == sorted(other.items())
    }
}
