//! for...in key enumeration and the custom iterator protocol

use std::cell::Cell;
use std::rc::Rc;

use super::{create_test_realm, key_strings};
use objmodel::{DescriptorPatch, IterResult, ModelError, ObjectId, Realm, Value};

/// `myObj[Symbol.iterator] = function () { ... return { next: () => ... } }`
///
/// The factory walks `Object.keys(this)`. `next` is an arrow closed over the
/// factory's receiver, so it reads from the iterable even though it is
/// called as a method of the iterator object.
fn install_key_iterator(realm: &mut Realm, obj: ObjectId) {
    let factory = realm.create_function("it", |realm, this, _| {
        let index = Rc::new(Cell::new(0usize));
        let next = realm.create_arrow_function(this, move |realm, this, _| {
            let Value::Object(target) = this else {
                return Err(ModelError::type_error("iterator lost its receiver"));
            };
            let keys = realm.keys(target)?;
            let current = index.get();
            index.set(current + 1);
            let value = match keys.get(current) {
                Some(key) => realm.get(target, key.clone())?,
                None => Value::Undefined,
            };
            let done = current + 1 > keys.len();
            Ok(Value::Object(realm.create_iter_result(value, done)))
        });
        Ok(Value::Object(realm.create_object_from([("next", next)])))
    });

    let key = realm.symbol_iterator();
    realm
        .define_property(
            obj,
            key,
            DescriptorPatch::new()
                .value(factory)
                .enumerable(false)
                .writable(false)
                .configurable(true),
        )
        .unwrap();
}

#[test]
fn test_for_in_counts_whole_chain() {
    let mut realm = create_test_realm();
    let my_obj = realm.create_object_from([("a", 1)]);
    let my_obj1 = realm.create_object_with_proto(Some(my_obj)).unwrap();
    realm.put(my_obj1, "b", 2).unwrap();
    let my_obj2 = realm.create_object_with_proto(Some(my_obj1)).unwrap();
    realm.put(my_obj2, "c", 3).unwrap();
    let my_obj3 = realm.create_object_with_proto(Some(my_obj2)).unwrap();
    realm.put(my_obj3, "d", 4).unwrap();

    let keys = key_strings(realm.enumerable_keys_in_chain(my_obj3).unwrap());
    assert_eq!(keys, vec!["d", "c", "b", "a"]);
}

#[test]
fn test_for_in_yields_each_key_once() {
    let mut realm = create_test_realm();
    let base = realm.create_object_from([("shared", 1), ("base_only", 2)]);
    let derived = realm.create_object_with_proto(Some(base)).unwrap();
    realm.put(derived, "shared", 3).unwrap();
    realm.put(derived, "own", 4).unwrap();

    let keys = key_strings(realm.enumerable_keys_in_chain(derived).unwrap());
    assert_eq!(keys, vec!["shared", "own", "base_only"]);
}

#[test]
fn test_for_in_is_restartable() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 1), ("b", 2)]);

    let mut first = realm.enumerable_keys_in_chain(obj).unwrap();
    assert!(first.next().is_some());
    let second = key_strings(realm.enumerable_keys_in_chain(obj).unwrap());
    assert_eq!(second, vec!["a", "b"]);
}

#[test]
fn test_for_in_skips_symbols() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 1)]);
    let sym = realm.create_symbol(Some("hidden"));
    realm.put(obj, sym, 2).unwrap();

    assert_eq!(key_strings(realm.enumerable_keys_in_chain(obj).unwrap()), vec!["a"]);
}

#[test]
fn test_custom_iterator_over_three_keys() {
    let mut realm = create_test_realm();
    let my_obj = realm.create_object_from([("a", 1), ("b", 2), ("c", 3)]);
    install_key_iterator(&mut realm, my_obj);

    let mut iterator = realm.custom_iterator(my_obj).unwrap();
    for expected in [1, 2, 3] {
        assert_eq!(
            iterator.step(&mut realm).unwrap(),
            IterResult {
                value: Value::from(expected),
                done: false
            }
        );
    }
    assert_eq!(
        iterator.step(&mut realm).unwrap(),
        IterResult {
            value: Value::Undefined,
            done: true
        }
    );
    assert!(iterator.is_done());

    assert_eq!(realm.for_of(my_obj).unwrap().len(), 3);

    // The iterator method itself does not show up in key enumeration
    assert_eq!(
        key_strings(realm.enumerable_keys_in_chain(my_obj).unwrap()),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_iterator_is_inherited() {
    let mut realm = create_test_realm();
    let proto = realm.create_object();
    install_key_iterator(&mut realm, proto);
    let obj = realm.create_object_with_proto(Some(proto)).unwrap();
    realm.put(obj, "x", 10).unwrap();
    realm.put(obj, "y", 20).unwrap();

    assert_eq!(
        realm.for_of(obj).unwrap(),
        vec![Value::from(10), Value::from(20)]
    );
}

#[test]
fn test_plain_object_is_not_iterable() {
    let mut realm = create_test_realm();
    let obj = realm.create_object_from([("a", 1)]);
    let err = realm.for_of(obj).unwrap_err();
    assert!(matches!(err, ModelError::NotIterable { .. }));

    let key = realm.symbol_iterator();
    realm.put(obj, key, 5).unwrap();
    let err = realm.custom_iterator(obj).unwrap_err();
    assert!(matches!(err, ModelError::NotIterable { .. }));
}

#[test]
fn test_iterator_method_must_return_object() {
    let mut realm = create_test_realm();
    let obj = realm.create_object();
    let factory = realm.create_method("[Symbol.iterator]", |_, _, _| Ok(Value::from(1)));
    let key = realm.symbol_iterator();
    realm.put(obj, key, factory).unwrap();

    let err = realm.custom_iterator(obj).unwrap_err();
    assert!(matches!(err, ModelError::TypeError { .. }));
}
