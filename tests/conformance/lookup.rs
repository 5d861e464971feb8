//! [[Get]], [[Put]] and [[HasProperty]]

use super::create_test_realm;
use objmodel::{DescriptorPatch, ModelError, Value};

#[test]
fn test_missing_property_is_undefined_not_an_error() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 2)]);

    assert_eq!(realm.get(obj, "b").unwrap(), Value::Undefined);

    // Identifier resolution is the path that fails
    let global = realm.global_scope();
    let err = realm.resolve(global, "someUndeclaredVariable").unwrap_err();
    assert!(matches!(err, ModelError::UnresolvedReference { .. }));
}

#[test]
fn test_in_versus_has_own_property() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 2)]);

    assert!(realm.has_property(obj, "a").unwrap());
    assert!(!realm.has_property(obj, "b").unwrap());
    assert!(realm.has_own_property(obj, "a").unwrap());
    assert!(!realm.has_own_property(obj, "b").unwrap());

    // Inherited methods are visible to `in` but are not own
    assert!(realm.has_property(obj, "hasOwnProperty").unwrap());
    assert_eq!(
        realm
            .call_method(obj, "hasOwnProperty", &[Value::from("hasOwnProperty")])
            .unwrap(),
        Value::Boolean(false)
    );
}

#[test]
fn test_put_creates_default_data_property() {
    let mut realm = create_test_realm();
    let obj = realm.create_object();
    realm.put(obj, "a", 1).unwrap();

    let desc = realm.get_own_property_descriptor(obj, "a").unwrap().unwrap();
    assert_eq!(desc.writable(), Some(true));
    assert!(desc.enumerable());
    assert!(desc.configurable());
}

#[test]
fn test_put_keeps_existing_attributes() {
    let mut realm = create_test_realm();
    let obj = realm.create_object();
    realm
        .define_property(obj, "a", DescriptorPatch::new().value(1).writable(true))
        .unwrap();

    realm.put(obj, "a", 2).unwrap();

    let desc = realm.get_own_property_descriptor(obj, "a").unwrap().unwrap();
    assert_eq!(desc.value(), Some(&Value::from(2)));
    assert!(!desc.enumerable());
    assert!(!desc.configurable());
}

#[test]
fn test_write_shadows_inherited_property() {
    let mut realm = create_test_realm();
    let proto = realm.create_object_from([("a", 1)]);
    let child = realm.create_object_with_proto(Some(proto)).unwrap();

    realm.put(child, "a", 2).unwrap();

    assert_eq!(realm.get(child, "a").unwrap(), Value::from(2));
    assert_eq!(realm.get(proto, "a").unwrap(), Value::from(1));
}

#[test]
fn test_shadowing_blocked_on_non_extensible_receiver() {
    let mut realm = create_test_realm();
    let proto = realm.create_object_from([("a", 1)]);
    let child = realm.create_object_with_proto(Some(proto)).unwrap();
    realm.prevent_extensions(child).unwrap();

    realm.put(child, "a", 2).unwrap();

    assert!(!realm.has_own_property(child, "a").unwrap());
    assert_eq!(realm.get(child, "a").unwrap(), Value::from(1));
}

#[test]
fn test_inherited_getter_sees_receiver() {
    let mut realm = create_test_realm();
    let getter = realm.create_method("get who", |realm, this, _| realm.get_value(&this, "name"));
    let proto = realm.create_object();
    realm
        .define_property(proto, "who", DescriptorPatch::new().getter(getter))
        .unwrap();
    let child = realm.create_object_with_proto(Some(proto)).unwrap();
    realm.put(child, "name", "child").unwrap();

    assert_eq!(realm.get(child, "who").unwrap(), Value::from("child"));
    assert_eq!(realm.get(proto, "who").unwrap(), Value::Undefined);
}

#[test]
fn test_getter_errors_propagate() {
    let mut realm = create_test_realm();
    let getter = realm.create_method("get", |_, _, _| Err(ModelError::type_error("boom")));
    let obj = realm.create_object();
    realm
        .define_property(obj, "x", DescriptorPatch::new().getter(getter))
        .unwrap();
    assert!(matches!(
        realm.get(obj, "x").unwrap_err(),
        ModelError::TypeError { .. }
    ));
}

#[test]
fn test_access_on_undefined_and_null() {
    let mut realm = create_test_realm();
    assert!(matches!(
        realm.get_value(&Value::Null, "a").unwrap_err(),
        ModelError::TypeError { .. }
    ));
    assert!(matches!(
        realm.put_value(&Value::Undefined, "a", 1).unwrap_err(),
        ModelError::TypeError { .. }
    ));
    assert_eq!(
        realm.get_value(&Value::from("text"), "a").unwrap(),
        Value::Undefined
    );
}

#[test]
fn test_symbol_keys_are_separate_from_strings() {
    let mut realm = create_test_realm();
    let sym = realm.create_symbol(Some("a"));
    let obj = realm.create_object();
    realm.put(obj, sym.clone(), 1).unwrap();

    assert_eq!(realm.get(obj, sym.clone()).unwrap(), Value::from(1));
    assert_eq!(realm.get(obj, "a").unwrap(), Value::Undefined);
    assert!(realm.keys(obj).unwrap().is_empty());
    assert_eq!(realm.own_property_symbols(obj).unwrap().len(), 1);
}
