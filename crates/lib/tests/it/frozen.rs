//!
//! FrozenMapping tests.
//!
//! Frozen mappings reject every write and hash by content, so they can be
//! used as set members and map keys.
//!

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use attrmap::{AttrMap, Class, FrozenMapping, Mapping, Value, frozen, mapping};

use crate::helpers::*;

// ===== READS =====

#[test]
fn test_frozen_reads_like_mapping() {
    let f = setup_frozen();

    assert_eq!(f.get_attr("x").unwrap(), 17);
    assert_eq!(f.get_key("x").unwrap(), 17);
    assert_eq!(f.get("x"), Some(&Value::Int(17)));
    assert!(f.contains_key("x"));
    assert_eq!(f.len(), 1);
    assert_eq!(f.to_string(), "FrozenMapping(x=17)");
}

#[test]
fn test_frozen_missing_attribute_message() {
    let f = FrozenMapping::new();
    assert_eq!(
        f.get_attr("a").unwrap_err().to_string(),
        "'FrozenMapping' object has no attribute 'a'"
    );
}

#[test]
fn test_frozen_members_include_mutators() {
    let f = setup_frozen();
    assert!(f.get_attr("insert").unwrap().is_member());
    assert!(f.get_attr("thaw").unwrap().is_member());
}

// ===== READ-ONLY GUARDS =====

#[test]
fn test_all_attribute_and_key_writes_fail() {
    let f = setup_frozen();
    assert_read_only(&f, "x");
    assert_read_only(&f, "missing");
}

#[test]
fn test_all_mutators_fail_and_leave_content_unchanged() {
    let f = setup_frozen();

    assert!(f.insert("x", 1).unwrap_err().is_read_only());
    assert!(f.remove("x").unwrap_err().is_read_only());
    assert!(f.pop("x").unwrap_err().is_read_only());
    assert!(f.setdefault("x", 1).unwrap_err().is_read_only());
    assert!(f.setdefault("new", 1).unwrap_err().is_read_only());
    assert!(f.update(&mapping!(x = 1)).unwrap_err().is_read_only());
    assert!(f.extend([("y", 2)]).unwrap_err().is_read_only());
    assert!(f.clear().unwrap_err().is_read_only());

    assert_eq!(f, frozen!(x = 17));
    assert_eq!(f.len(), 1);
}

#[test]
fn test_read_only_message_names_subclass() {
    let f = FrozenMapping::of_class(Class::new("Settings"), [("debug", false)]);
    let err = f.set_attr("debug", Value::from(true)).unwrap_err();
    assert_eq!(err.to_string(), "'Settings' object attributes are read-only");
    assert_eq!(f.get("debug"), Some(&Value::Bool(false)));
}

// ===== HASHING =====

#[test]
fn test_equal_content_hashes_equal() {
    let a = frozen!(x = 1, y = 2);
    let b = frozen!(y = 2, x = 1);

    assert_eq!(a, b);
    assert_eq!(a.hash_value(), b.hash_value());
}

#[test]
fn test_different_content_hashes_differ() {
    assert_ne!(frozen!(x = 1).hash_value(), frozen!(x = 2).hash_value());
    assert_ne!(frozen!(x = 1).hash_value(), frozen!(y = 1).hash_value());
}

#[test]
fn test_hash_is_cached_after_first_use() {
    let f = frozen!(x = 1);
    assert_eq!(f.cached_hash(), None);

    let hash = f.hash_value();
    assert_eq!(f.cached_hash(), Some(hash));
    assert_eq!(f.clone().cached_hash(), Some(hash));
}

#[test]
fn test_hash_set_membership() {
    let mut set = HashSet::new();
    set.insert(frozen!(x = 1, y = 2));

    assert!(set.contains(&frozen!(y = 2, x = 1)));
    assert!(!set.contains(&frozen!(x = 1)));

    // A structurally equal instance is not added twice
    set.insert(frozen!(x = 1, y = 2));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_frozen_as_map_key() {
    let mut counts: HashMap<FrozenMapping, i64> = HashMap::new();
    *counts.entry(frozen!(a = 1)).or_default() += 1;
    *counts.entry(frozen!(a = 1)).or_default() += 1;
    assert_eq!(counts[&frozen!(a = 1)], 2);
}

#[test]
fn test_nested_frozen_values_hash_by_content() {
    let a = frozen!(inner = frozen!(x = 1));
    let b = frozen!(inner = frozen!(x = 1));
    assert_eq!(a.hash_value(), b.hash_value());

    let mut set = HashSet::new();
    set.insert(Value::from(a));
    assert!(set.contains(&Value::from(b)));
}

#[test]
fn test_nested_mutable_content_is_never_cached() {
    let inner = mapping!(a = 1);
    let first = frozen!(m = &inner);
    let before = first.hash_value();
    assert_eq!(first.cached_hash(), None);

    inner.insert("b", 2);
    let second = first.copy();

    assert_eq!(first.cmp(&second), Ordering::Equal);
    assert_eq!(first, second);
    assert_eq!(first.hash_value(), second.hash_value());
    assert_ne!(first.hash_value(), before);
}

#[test]
fn test_frozen_keys_and_values_match_mapping_shape() {
    let f = frozen!(b = 1, a = 2);
    let m = f.thaw();
    assert_eq!(f.keys(), m.keys());
    assert_eq!(f.values(), m.values());
    assert_eq!(f.iter().count(), 2);
}

// ===== COMBINING =====

#[test]
fn test_frozen_add_is_new_frozen_instance() {
    let f = frozen!(a = 1);
    let sum = &f + &mapping!(b = 2);

    assert!(!sum.ptr_eq(&f));
    assert_eq!(sum, frozen!(a = 1, b = 2));
    assert_eq!(f, frozen!(a = 1));
}

#[test]
fn test_frozen_in_place_add_rebinds() {
    let mut f = frozen!(a = 1);
    let original = f.clone();

    f += &mapping!(b = 2);

    assert!(!f.ptr_eq(&original));
    assert_eq!(original, frozen!(a = 1));
    assert_eq!(f, frozen!(a = 1, b = 2));

    let returned = original.in_place_add(&mapping!(c = 3));
    assert!(!returned.ptr_eq(&original));
}

#[test]
fn test_frozen_union_keeps_class() {
    let f = FrozenMapping::of_class(Class::new("Settings"), [("a", 1)]);
    let sum = &f | &[("b", 2)];
    assert_eq!(sum.class().name(), "Settings");
    assert_eq!(sum.to_string(), "Settings(a=1, b=2)");
}

#[test]
fn test_freeze_and_thaw() {
    let m = mapping!(a = 1);
    let f = m.freeze();
    assert_eq!(f, m);
    assert_eq!(m, f);

    m.insert("b", 2);
    assert_eq!(f.len(), 1);

    let thawed: Mapping = f.thaw();
    thawed.insert("c", 3);
    assert_eq!(f, frozen!(a = 1));
}

#[test]
fn test_frozen_copy_is_equal_new_instance() {
    let f = frozen!(a = 1);
    let copied = f.copy();
    assert_eq!(copied, f);
    assert!(!copied.ptr_eq(&f));
}

#[test]
fn test_frozen_shared_across_threads() {
    let f = frozen!(a = 1, b = 2);
    let expected = frozen!(b = 2, a = 1).hash_value();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let f = f.clone();
            std::thread::spawn(move || f.hash_value())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
