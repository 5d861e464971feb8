//! Iteration: key enumeration along the prototype chain (`for...in`) and the
//! custom iterator protocol (`for...of`)

use crate::binder::{CallExpression, CallShape};
use crate::error::ModelError;
use crate::object::{ObjectGraph, ObjectId};
use crate::prelude::FxHashSet;
use crate::property::PropertyKey;
use crate::realm::Realm;
use crate::value::Value;

/// Lazy walk over the enumerable string keys of an object and its prototypes
///
/// Own keys come first in insertion order, then each prototype's. A key seen
/// on a more-derived object is never produced again, even when that
/// shadowing property is not enumerable itself.
pub struct EnumerableKeys<'r> {
    graph: &'r ObjectGraph,
    current: Option<ObjectId>,
    position: usize,
    seen: FxHashSet<PropertyKey>,
}

impl Iterator for EnumerableKeys<'_> {
    type Item = PropertyKey;

    fn next(&mut self) -> Option<PropertyKey> {
        loop {
            let id = self.current?;
            let graph = self.graph;
            let record = graph.record(id).ok()?;
            match record.properties.get_index(self.position) {
                Some((key, desc)) => {
                    self.position += 1;
                    if key.is_symbol() || !self.seen.insert(key.clone()) {
                        continue;
                    }
                    if desc.enumerable() {
                        return Some(key.clone());
                    }
                }
                None => {
                    self.current = record.prototype();
                    self.position = 0;
                }
            }
        }
    }
}

/// `{ value, done }` as produced by an iterator's `next()`
#[derive(Debug, Clone, PartialEq)]
pub struct IterResult {
    pub value: Value,
    pub done: bool,
}

/// An iterator obtained through `@@iterator`. Single pass: once it reports
/// `done`, `next()` is not called again.
#[derive(Debug, Clone)]
pub struct IteratorRecord {
    iterator: ObjectId,
    done: bool,
}

impl IteratorRecord {
    pub fn iterator(&self) -> ObjectId {
        self.iterator
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance the iterator by calling its `next()` method
    pub fn step(&mut self, realm: &mut Realm) -> Result<IterResult, ModelError> {
        if self.done {
            return Ok(IterResult {
                value: Value::Undefined,
                done: true,
            });
        }

        let result = realm.call_method(self.iterator, "next", &[])?;
        let Value::Object(result) = result else {
            return Err(ModelError::type_error(format!(
                "Iterator result {:?} is not an object",
                result
            )));
        };
        let done = realm.get(result, "done")?.to_boolean();
        let value = realm.get(result, "value")?;
        self.done = done;
        Ok(IterResult { value, done })
    }
}

impl Realm {
    /// Keys a `for...in` loop over `obj` visits
    pub fn enumerable_keys_in_chain(&self, obj: ObjectId) -> Result<EnumerableKeys<'_>, ModelError> {
        self.graph.record(obj)?;
        Ok(EnumerableKeys {
            graph: &self.graph,
            current: Some(obj),
            position: 0,
            seen: FxHashSet::default(),
        })
    }

    /// Start the iterator protocol on `obj`: call its `@@iterator` method
    /// (own or inherited) with `obj` as the receiver
    pub fn custom_iterator(&mut self, obj: ObjectId) -> Result<IteratorRecord, ModelError> {
        let key = self.symbol_iterator();
        let method = self.get(obj, key)?;
        if !self.is_callable(&method) {
            return Err(ModelError::not_iterable(obj));
        }

        let iterator = self.call(CallExpression {
            callee: method,
            shape: CallShape::Method {
                base: Value::Object(obj),
            },
            args: Vec::new(),
        })?;
        match iterator {
            Value::Object(iterator) => Ok(IteratorRecord {
                iterator,
                done: false,
            }),
            other => Err(ModelError::type_error(format!(
                "Result of the Symbol.iterator method is not an object: {:?}",
                other
            ))),
        }
    }

    /// Drain the iterator protocol the way `for...of` does
    pub fn for_of(&mut self, obj: ObjectId) -> Result<Vec<Value>, ModelError> {
        let mut iter = self.custom_iterator(obj)?;
        let mut values = Vec::new();
        loop {
            let step = iter.step(self)?;
            if step.done {
                break;
            }
            values.push(step.value);
        }
        Ok(values)
    }

    /// `{ value, done }` object for iterator bodies to return from `next()`
    pub fn create_iter_result(&mut self, value: Value, done: bool) -> ObjectId {
        self.create_object_from([("value", value), ("done", Value::Boolean(done))])
    }
}
