//! Tests for `Schema` and `NamedMapping` records.

use attrmap::{FrozenMapping, Mapping, Schema, Value, mapping};

#[test]
fn test_positional_and_named_construction() {
    let schema = Schema::parse(Some("Point"), "x y");
    let p = schema.instantiate([Value::from(1)], [("y", 2)]).unwrap();

    assert_eq!(p.get_attr("x").unwrap(), &Value::Int(1));
    assert_eq!(p.get("y"), Some(&Value::Int(2)));
    assert_eq!(p.to_string(), "Point(x=1, y=2)");
    assert_eq!(p.keys().collect::<Vec<_>>(), vec!["x", "y"]);
}

#[test]
fn test_unset_fields_take_defaults() {
    let schema = Schema::builder("Config")
        .field("name")
        .field_with_default("retries", 3)
        .build();
    let c = schema.instantiate([], [("name", "svc")]).unwrap();

    assert_eq!(c.get("retries"), Some(&Value::Int(3)));
    assert_eq!(schema.default_instance().get("name"), Some(&Value::Null));
}

#[test]
fn test_too_many_positional_values() {
    let schema = Schema::parse(None, "foo, bar");
    let err = schema
        .instantiate([Value::from(1), Value::from(2), Value::from(3)], [] as [(&str, i64); 0])
        .unwrap_err();

    assert!(err.is_schema_error());
    assert_eq!(
        err.to_string(),
        "NamedMapping() takes 2 positional values but 3 were given"
    );
}

#[test]
fn test_field_given_twice() {
    let schema = Schema::parse(None, "foo, bar");
    let err = schema
        .instantiate([Value::from(1)], [("foo", 2)])
        .unwrap_err();
    assert!(err.is_schema_error());
}

#[test]
fn test_unknown_field() {
    let schema = Schema::parse(None, "foo");
    let err = schema.instantiate([], [("bar", 1)]).unwrap_err();
    assert!(err.is_schema_error());
    assert_eq!(err.class(), Some("NamedMapping"));
}

#[test]
fn test_writes_limited_to_fields() {
    let schema = Schema::parse(None, "foo");
    let mut record = schema.default_instance();

    assert_eq!(record.set("foo", 5).unwrap(), Value::Null);
    record.set_attr("foo", 6).unwrap();
    assert_eq!(record.get("foo"), Some(&Value::Int(6)));

    assert!(record.set("bar", 1).unwrap_err().is_schema_error());
    assert!(record.set_attr("bar", 1).unwrap_err().is_attribute_error());
    assert_eq!(record.len(), 1);
}

#[test]
fn test_inherited_schema_extends_parent() {
    let base = Schema::parse(Some("Base"), "foo");
    let derived = Schema::builder("Derived")
        .field_with_default("bar", true)
        .inherit(&base)
        .build();

    let record = derived.instantiate([Value::from(1)], [] as [(&str, i64); 0]).unwrap();
    assert_eq!(record.to_string(), "Derived(bar=true, foo=1)");
}

#[test]
fn test_record_converts_to_mappings() {
    let schema = Schema::parse(None, "a b");
    let record = schema
        .instantiate([Value::from(1), Value::from(2)], [] as [(&str, i64); 0])
        .unwrap();

    let m: Mapping = record.to_mapping();
    assert_eq!(m, mapping!(a = 1, b = 2));
    assert_eq!(record, m);

    let f: FrozenMapping = record.freeze();
    assert_eq!(record, f);
    assert_eq!(Mapping::from_entries(&record).keys(), vec!["a", "b"]);
}
