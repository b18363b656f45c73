use attrmap::{AttrMap, Class, FrozenMapping, Mapping, MappingError, Value};

/// The `FooMapping` subtype used to check that operations keep the class
pub fn foo_class() -> Class {
    Class::new("FooMapping")
}

/// `Mapping(a=1, b=2, c=3)`
pub fn setup_abc() -> Mapping {
    Mapping::from_pairs([("a", 1), ("b", 2), ("c", 3)])
}

/// A mapping that holds itself under the key `s`
pub fn setup_self_referencing() -> Mapping {
    let m = Mapping::new();
    m.insert("s", &m);
    m
}

/// Assert that every write path on `map` fails as read-only and leaves it unchanged
pub fn assert_read_only(map: &dyn AttrMap, key: &str) {
    let before = map.entries();

    let results: Vec<Result<(), MappingError>> = vec![
        map.set_key(key, Value::Int(42)).map(|_| ()),
        map.del_key(key).map(|_| ()),
        map.set_attr(key, Value::Int(42)),
        map.del_attr(key),
        map.set_attr("brand_new", Value::Null),
    ];
    for result in results {
        let err = result.expect_err("write to a frozen mapping succeeded");
        assert!(err.is_read_only(), "unexpected error: {err}");
        assert_eq!(
            err.to_string(),
            format!("'{}' object attributes are read-only", map.class())
        );
    }

    assert_eq!(map.entries(), before);
}

/// A frozen mapping with a single `x=17` entry
pub fn setup_frozen() -> FrozenMapping {
    FrozenMapping::from_pairs([("x", 17)])
}
