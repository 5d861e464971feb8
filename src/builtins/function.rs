//! Function.prototype built-in methods (call, apply, bind)

use std::rc::Rc;

use crate::error::ModelError;
use crate::object::ObjectId;
use crate::property::PropertyKey;
use crate::realm::Realm;
use crate::value::Value;

/// Initialize Function.prototype with call, apply, bind methods
pub fn init_function_prototype(realm: &mut Realm) {
    let proto = realm.function_prototype();

    realm.register_method(proto, "call", Rc::new(function_call));
    realm.register_method(proto, "apply", Rc::new(function_apply));
    realm.register_method(proto, "bind", Rc::new(function_bind));
}

// Function.prototype.call - `this` is the function, args[0] the receiver
pub fn function_call(realm: &mut Realm, this: Value, args: &[Value]) -> Result<Value, ModelError> {
    let this_arg = args.first().cloned().unwrap_or_default();
    let call_args = args.get(1..).unwrap_or_default();
    realm.call_function(&this, this_arg, call_args)
}

// Function.prototype.apply - call with a receiver and an array-like of arguments
pub fn function_apply(realm: &mut Realm, this: Value, args: &[Value]) -> Result<Value, ModelError> {
    let this_arg = args.first().cloned().unwrap_or_default();
    let call_args = match args.get(1) {
        Some(Value::Object(list)) => array_like_to_vec(realm, *list)?,
        None | Some(Value::Undefined) | Some(Value::Null) => Vec::new(),
        Some(_) => {
            return Err(ModelError::type_error(
                "Second argument to apply must be an array-like object",
            ));
        }
    };
    realm.call_function(&this, this_arg, &call_args)
}

// Function.prototype.bind - new function with a fixed receiver and leading arguments
pub fn function_bind(realm: &mut Realm, this: Value, args: &[Value]) -> Result<Value, ModelError> {
    if !realm.is_callable(&this) {
        return Err(ModelError::type_error("Bind must be called on a function"));
    }
    let this_arg = args.first().cloned().unwrap_or_default();
    let bound_args = args.get(1..).unwrap_or_default().to_vec();
    let bound = realm.bind(&this, this_arg, bound_args)?;
    Ok(Value::Object(bound))
}

/// Largest argument list an array-like may describe
const MAX_ARRAY_LIKE_LENGTH: u32 = u32::MAX;

/// Read `length` and then each index of an array-like object
fn array_like_to_vec(realm: &mut Realm, list: ObjectId) -> Result<Vec<Value>, ModelError> {
    let length = match realm.get(list, "length")? {
        Value::Number(n) if n > f64::from(MAX_ARRAY_LIKE_LENGTH) => {
            return Err(ModelError::type_error(format!(
                "Invalid array length {} for apply argument list",
                n
            )));
        }
        Value::Number(n) if n > 0.0 => n as usize,
        _ => 0,
    };
    // `length` is caller supplied; grow as the indices are read
    let mut values = Vec::new();
    for index in 0..length {
        values.push(realm.get(list, PropertyKey::from(index))?);
    }
    Ok(values)
}
