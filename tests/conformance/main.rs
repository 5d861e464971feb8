//! Conformance tests for the object model, organized by rule family
//!
//! Each module drives the public `Realm` API the way a host harness would:
//! build an object graph, perform reads, writes and calls, compare outcomes.
//!
//! Set `RUST_LOG=objmodel=trace` to see ignored writes and binding decisions:
//!
//! ```bash
//! RUST_LOG=objmodel=trace cargo test --test conformance -- --nocapture
//! ```

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

mod immutability;
mod iteration;
mod lookup;
mod scope;

use objmodel::{ModelError, ObjectId, PropertyKey, Realm, RealmConfig, Value, WritePolicy};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A realm with the default (silent) write policy
pub fn create_test_realm() -> Realm {
    init_tracing();
    Realm::new()
}

/// A realm where rejected writes raise `TypeConflict`
pub fn create_strict_realm() -> Realm {
    init_tracing();
    Realm::with_config(RealmConfig {
        write_policy: WritePolicy::Strict,
    })
}

/// `function name() { return this.key; }`
///
/// Without a receiver it returns `undefined` instead of failing, so
/// default-binding results can be compared directly.
pub fn this_reader(realm: &mut Realm, name: &str, key: &'static str) -> ObjectId {
    realm.create_function(name, move |realm, this, _| match this {
        Value::Object(obj) => realm.get(obj, key),
        _ => Ok(Value::Undefined),
    })
}

/// `function name(value) { this.key = value; }`
pub fn this_writer(realm: &mut Realm, name: &str, key: &'static str) -> ObjectId {
    realm.create_function(name, move |realm, this, args| {
        let value = args.first().cloned().unwrap_or_default();
        realm.put_value(&this, key, value)?;
        Ok(Value::Undefined)
    })
}

/// `function identity() { return this; }`
pub fn this_identity(realm: &mut Realm) -> ObjectId {
    realm.create_function("identity", |_, this, _| Ok(this))
}

/// String concatenation for the handful of values these tests combine
pub fn concat(left: &Value, right: &Value) -> Value {
    Value::from(format!("{}{}", left.to_js_string(), right.to_js_string()))
}

pub fn key_strings(keys: impl IntoIterator<Item = PropertyKey>) -> Vec<String> {
    keys.into_iter().map(|k| k.to_string()).collect()
}

pub fn assert_type_conflict<T: std::fmt::Debug>(result: Result<T, ModelError>) {
    match result {
        Err(ModelError::TypeConflict { .. }) => {}
        other => panic!("expected TypeConflict, got {:?}", other),
    }
}
