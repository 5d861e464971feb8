//! Identifier resolution

use super::{create_strict_realm, create_test_realm};
use objmodel::{ModelError, Value};

#[test]
fn test_undeclared_identifier_is_unresolved() {
    let realm = create_test_realm();
    let err = realm
        .resolve(realm.global_scope(), "someUndeclaredVariable")
        .unwrap_err();
    assert!(matches!(err, ModelError::UnresolvedReference { .. }));
    assert_eq!(
        err.to_string(),
        "UnresolvedReference: someUndeclaredVariable is not defined"
    );
}

#[test]
fn test_closure_scope_sees_outer_bindings() {
    let mut realm = create_test_realm();
    let global = realm.global_scope();
    realm.declare(global, "outer", 1);
    let function_scope = realm.create_scope(global);
    realm.declare(function_scope, "local", 2);
    let block = realm.create_scope(function_scope);

    assert_eq!(realm.resolve(block, "outer").unwrap(), Value::from(1));
    assert_eq!(realm.resolve(block, "local").unwrap(), Value::from(2));
    assert!(realm.resolve(global, "local").is_err());
}

#[test]
fn test_sloppy_assignment_creates_global() {
    let mut realm = create_test_realm();
    let inner = realm.create_scope(realm.global_scope());
    realm.assign(inner, "implicit", 3).unwrap();
    assert_eq!(
        realm.resolve(realm.global_scope(), "implicit").unwrap(),
        Value::from(3)
    );
}

#[test]
fn test_strict_assignment_to_undeclared_fails() {
    let mut realm = create_strict_realm();
    let global = realm.global_scope();
    let err = realm.assign(global, "implicit", 3).unwrap_err();
    assert!(matches!(err, ModelError::UnresolvedReference { .. }));
}

#[test]
fn test_bindings_can_hold_objects() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 2)]);
    let global = realm.global_scope();
    realm.declare_const(global, "myObj", obj);

    let resolved = realm.resolve(global, "myObj").unwrap();
    assert_eq!(resolved, Value::Object(obj));
    assert_eq!(realm.get_value(&resolved, "b").unwrap(), Value::Undefined);
}
