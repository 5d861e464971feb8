//! Object.prototype built-in methods

use std::rc::Rc;

use crate::error::ModelError;
use crate::property::PropertyKey;
use crate::realm::Realm;
use crate::value::Value;

/// Initialize Object.prototype with hasOwnProperty, isPrototypeOf and
/// propertyIsEnumerable
pub fn init_object_prototype(realm: &mut Realm) {
    let proto = realm.object_prototype();

    realm.register_method(proto, "hasOwnProperty", Rc::new(object_has_own_property));
    realm.register_method(proto, "isPrototypeOf", Rc::new(object_is_prototype_of));
    realm.register_method(
        proto,
        "propertyIsEnumerable",
        Rc::new(object_property_is_enumerable),
    );
}

pub fn object_has_own_property(
    realm: &mut Realm,
    this: Value,
    args: &[Value],
) -> Result<Value, ModelError> {
    let Value::Object(obj) = this else {
        return Ok(Value::Boolean(false));
    };
    let key = PropertyKey::from_value(args.first().unwrap_or(&Value::Undefined));
    Ok(Value::Boolean(realm.has_own_property(obj, key)?))
}

pub fn object_is_prototype_of(
    realm: &mut Realm,
    this: Value,
    args: &[Value],
) -> Result<Value, ModelError> {
    // Primitives have no prototype chain to search
    let (Value::Object(candidate), Some(Value::Object(obj))) = (this, args.first()) else {
        return Ok(Value::Boolean(false));
    };
    Ok(Value::Boolean(realm.is_prototype_of(candidate, *obj)?))
}

pub fn object_property_is_enumerable(
    realm: &mut Realm,
    this: Value,
    args: &[Value],
) -> Result<Value, ModelError> {
    let Value::Object(obj) = this else {
        return Ok(Value::Boolean(false));
    };
    let key = PropertyKey::from_value(args.first().unwrap_or(&Value::Undefined));
    Ok(Value::Boolean(realm.property_is_enumerable(obj, key)?))
}
