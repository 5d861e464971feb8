//! preventExtensions, seal and freeze

use super::{assert_type_conflict, create_strict_realm, create_test_realm};
use objmodel::{DescriptorPatch, PropertyDescriptor, Value};

#[test]
fn test_constant_property() {
    let mut realm = create_test_realm();
    let obj = realm.create_object();
    realm
        .define_property(
            obj,
            "BEST_SINGER",
            DescriptorPatch::new()
                .value("Freddie Mercury")
                .writable(false)
                .configurable(false),
        )
        .unwrap();

    realm.put(obj, "BEST_SINGER", "Chris Cornell").unwrap();

    assert_eq!(
        realm.get(obj, "BEST_SINGER").unwrap(),
        Value::from("Freddie Mercury")
    );
}

#[test]
fn test_prevent_extensions_blocks_new_properties() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 2)]);
    realm.prevent_extensions(obj).unwrap();

    realm.put(obj, "b", "fail").unwrap();

    assert_eq!(realm.keys(obj).unwrap().len(), 1);
    assert_eq!(realm.get(obj, "b").unwrap(), Value::Undefined);
    assert!(!realm.is_extensible(obj).unwrap());

    // Existing properties stay writable and deletable
    realm.put(obj, "a", 3).unwrap();
    assert_eq!(realm.get(obj, "a").unwrap(), Value::from(3));
    assert!(realm.delete_property(obj, "a").unwrap());
}

#[test]
fn test_seal_keeps_values_writable() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 2)]);
    realm.seal(obj).unwrap();

    realm.put(obj, "b", "fail").unwrap();

    assert_eq!(realm.keys(obj).unwrap().len(), 1);
    assert_type_conflict(realm.define_property(obj, "a", DescriptorPatch::new().configurable(true)));

    realm.put(obj, "a", "can still change values with .seal").unwrap();
    assert_eq!(
        realm.get(obj, "a").unwrap(),
        Value::from("can still change values with .seal")
    );
    assert!(realm.is_sealed(obj).unwrap());
    assert!(!realm.is_frozen(obj).unwrap());
}

#[test]
fn test_freeze_blocks_writes() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 2)]);
    realm.freeze(obj).unwrap();

    realm.put(obj, "b", "fail").unwrap();

    assert_eq!(realm.keys(obj).unwrap().len(), 1);
    assert_type_conflict(realm.define_property(obj, "a", DescriptorPatch::new().configurable(true)));

    realm.put(obj, "a", "can't change values with .freeze").unwrap();
    assert_eq!(realm.get(obj, "a").unwrap(), Value::from(2));
    assert!(realm.is_frozen(obj).unwrap());
}

#[test]
fn test_freeze_is_idempotent() {
    let mut realm = create_test_realm();
    let once = realm.create_object_from([("a", 1), ("b", 2)]);
    let twice = realm.create_object_from([("a", 1), ("b", 2)]);

    realm.freeze(once).unwrap();
    realm.freeze(twice).unwrap();
    realm.freeze(twice).unwrap();

    for key in ["a", "b"] {
        assert_eq!(
            realm.get_own_property_descriptor(once, key).unwrap(),
            realm.get_own_property_descriptor(twice, key).unwrap()
        );
    }
    assert_eq!(
        realm.is_extensible(once).unwrap(),
        realm.is_extensible(twice).unwrap()
    );
}

#[test]
fn test_freeze_is_shallow() {
    let mut realm = create_test_realm();
    let inner = realm.create_object_from([("x", 1)]);
    let outer = realm.create_object_from([("inner", inner)]);
    realm.freeze(outer).unwrap();

    realm.put(inner, "x", 2).unwrap();
    assert_eq!(realm.get(inner, "x").unwrap(), Value::from(2));
}

#[test]
fn test_freeze_keeps_accessors_working() {
    let mut realm = create_test_realm();
    let set = realm.create_method("set", |realm, this, args| {
        let value = args.first().cloned().unwrap_or_default();
        realm.put_value(&this, "stored", value)?;
        Ok(Value::Undefined)
    });
    let store = realm.create_object();
    realm
        .define_property(store, "x", DescriptorPatch::new().setter(set))
        .unwrap();
    let target = realm.create_object_with_proto(Some(store)).unwrap();
    realm.freeze(store).unwrap();

    // The setter runs with `target` as receiver; `target` itself is not frozen
    realm.put(target, "x", 5).unwrap();
    assert_eq!(realm.get(target, "stored").unwrap(), Value::from(5));
    assert!(matches!(
        realm.get_own_property_descriptor(store, "x").unwrap(),
        Some(PropertyDescriptor::Accessor {
            configurable: false,
            ..
        })
    ));
}

#[test]
fn test_non_writable_prototype_property_blocks_shadowing() {
    let mut realm = create_test_realm();
    let proto = realm.create_object_from([("a", 1)]);
    realm.freeze(proto).unwrap();
    let child = realm.create_object_with_proto(Some(proto)).unwrap();

    realm.put(child, "a", 2).unwrap();

    assert!(!realm.has_own_property(child, "a").unwrap());
    assert_eq!(realm.get(child, "a").unwrap(), Value::from(1));

    // defineProperty is not [[Put]] and may still shadow
    realm
        .define_property(child, "a", DescriptorPatch::new().value(2))
        .unwrap();
    assert_eq!(realm.get(child, "a").unwrap(), Value::from(2));
}

#[test]
fn test_strict_policy_raises_on_ignored_writes() {
    let mut realm = create_strict_realm();
    let obj = realm.create_object_from([("a", 2)]);
    realm.freeze(obj).unwrap();

    assert_type_conflict(realm.put(obj, "a", 3));
    assert_type_conflict(realm.put(obj, "b", 3));
    assert_type_conflict(realm.define_property(obj, "c", DescriptorPatch::new().value(1)));
    assert_eq!(realm.get(obj, "a").unwrap(), Value::from(2));
    assert!(!realm.has_own_property(obj, "b").unwrap());
}
