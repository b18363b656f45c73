//!
//! Persistence tests.
//!
//! Mappings persist as a `(type, frozen, content)` triple and restore through
//! the constructor of their kind, keeping the class name.
//!

use attrmap::{AttrMap, Class, FrozenMapping, Mapping, Reduced, Value, frozen, mapping};

use crate::helpers::*;

#[test]
fn test_frozen_round_trip() {
    let original = setup_frozen();
    original.hash_value();

    let json = original.to_json().unwrap();
    let restored = FrozenMapping::from_json(&json).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.class().name(), "FrozenMapping");
    // The cache is recomputed, never persisted
    assert_eq!(restored.cached_hash(), None);
    assert_eq!(restored.hash_value(), original.hash_value());
}

#[test]
fn test_frozen_round_trip_stays_read_only() {
    let restored = FrozenMapping::from_json(&setup_frozen().to_json().unwrap()).unwrap();
    assert!(restored.set_attr("x", Value::from(1)).unwrap_err().is_read_only());
}

#[test]
fn test_mapping_round_trip_keeps_class() {
    let original = Mapping::of_class(foo_class(), [("a", 1), ("b", 2)]);
    let restored = Mapping::from_json(&original.to_json().unwrap()).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.class(), &foo_class());
    assert!(!restored.ptr_eq(&original));
}

#[test]
fn test_nested_values_round_trip() {
    let original = mapping!(
        inner = mapping!(x = 1),
        fixed = frozen!(y = "two"),
        list = vec![Value::Null, Value::from(true)]
    );
    let restored = Mapping::from_json(&original.to_json().unwrap()).unwrap();

    assert_eq!(restored, original);
    assert!(restored.get("fixed").unwrap().as_frozen().is_some());
    assert!(restored.get("inner").unwrap().as_mapping().is_some());
}

#[test]
fn test_mutability_is_checked_on_restore() {
    let json = mapping!(a = 1).to_json().unwrap();
    let err = FrozenMapping::from_json(&json).unwrap_err();
    assert!(err.is_serialization_error());

    let json = frozen!(a = 1).to_json().unwrap();
    assert!(Mapping::from_json(&json).is_err());
}

#[test]
fn test_self_referencing_round_trip() {
    let m = setup_self_referencing();
    m.insert("x", 1);

    let restored = Mapping::from_json(&m.to_json().unwrap()).unwrap();

    assert_eq!(restored, m);
    assert!(!restored.ptr_eq(&m));
    let inner = restored.get("s").and_then(Value::into_mapping).unwrap();
    assert!(inner.ptr_eq(&restored));
    assert_eq!(restored.to_string(), "Mapping(s=Mapping(...), x=1)");
}

#[test]
fn test_indirect_cycle_round_trip() {
    let a = Mapping::new();
    let b = Mapping::with_class(foo_class());
    a.insert("b", &b);
    b.insert("a", &a);

    let restored = Mapping::from_json(&a.to_json().unwrap()).unwrap();
    let restored_b = restored.get("b").and_then(Value::into_mapping).unwrap();
    let back = restored_b.get("a").and_then(Value::into_mapping).unwrap();

    assert_eq!(restored_b.class(), &foo_class());
    assert!(back.ptr_eq(&restored));
}

#[test]
fn test_cycle_through_frozen_round_trip() {
    let m = Mapping::new();
    m.insert("f", frozen!(owner = &m));

    let restored = Mapping::from_json(&m.to_json().unwrap()).unwrap();
    let f = restored.get("f").and_then(Value::into_frozen).unwrap();
    let owner = f.get("owner").and_then(Value::as_mapping).unwrap();
    assert!(owner.ptr_eq(&restored));
}

#[test]
fn test_shared_handle_stays_shared() {
    let shared = mapping!(x = 1);
    let fixed = frozen!(first = &shared, second = &shared);

    let restored = FrozenMapping::from_json(&fixed.to_json().unwrap()).unwrap();
    let first = restored.get("first").and_then(Value::as_mapping).unwrap();
    let second = restored.get("second").and_then(Value::as_mapping).unwrap();

    assert!(first.ptr_eq(second));
    assert!(!first.ptr_eq(&shared));
}

#[test]
fn test_reduce_and_restore() {
    let f = FrozenMapping::of_class(Class::new("Settings"), [("debug", true)]);
    let reduced: Reduced = f.reduce();

    assert!(reduced.frozen);
    assert_eq!(reduced.class.name(), "Settings");

    let restored = reduced.restore();
    assert_eq!(restored.as_frozen(), Some(&f));
    assert_eq!(restored.to_string(), "Settings(debug=true)");
}
