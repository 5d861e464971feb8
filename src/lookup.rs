//! Property lookup: `[[Get]]`, `[[Put]]`, `[[HasProperty]]` and the own
//! property queries built on the same chain walk
//!
//! A missing property reads as `undefined`; it is never an error. That is the
//! difference from identifier resolution in [`scope`](crate::scope), which
//! fails with `UnresolvedReference`.

use crate::binder::CallShape;
use crate::error::ModelError;
use crate::object::ObjectId;
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::realm::Realm;
use crate::value::Value;

impl Realm {
    /// `[[Get]]`: walk `obj` and its prototypes; the first own descriptor
    /// wins. Getters run with `obj` as the receiver, not the object that
    /// holds the accessor.
    pub fn get(&mut self, obj: ObjectId, key: impl Into<PropertyKey>) -> Result<Value, ModelError> {
        let key = key.into();
        let found = self
            .graph
            .find_property(obj, &key)?
            .map(|(_, desc)| desc.clone());

        match found {
            None => Ok(Value::Undefined),
            Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
            Some(PropertyDescriptor::Accessor {
                get: Some(getter), ..
            }) => self.invoke(
                getter,
                CallShape::Method {
                    base: Value::Object(obj),
                },
                &[],
            ),
            Some(PropertyDescriptor::Accessor { get: None, .. }) => Ok(Value::Undefined),
        }
    }

    /// Property access on an arbitrary value (`base.key`)
    ///
    /// Reading from `undefined`/`null` is a type error. Other primitives are
    /// not boxed here, so every property reads as `undefined`.
    pub fn get_value(&mut self, base: &Value, key: impl Into<PropertyKey>) -> Result<Value, ModelError> {
        let key = key.into();
        match base {
            Value::Object(obj) => self.get(*obj, key),
            Value::Undefined | Value::Null => Err(ModelError::type_error(format!(
                "Cannot read properties of {:?} (reading '{}')",
                base, key
            ))),
            _ => Ok(Value::Undefined),
        }
    }

    /// `[[Put]]`
    ///
    /// - an accessor anywhere on the chain: call its setter with `obj` as the
    ///   receiver, or ignore the write when there is none
    /// - a non-writable data property anywhere on the chain: ignore the write
    /// - a writable own data property: overwrite the value in place
    /// - a writable inherited data property, or nothing: add an own data
    ///   property if `obj` is extensible
    pub fn put(
        &mut self,
        obj: ObjectId,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let key = key.into();
        let value = value.into();
        let found = self
            .graph
            .find_property(obj, &key)?
            .map(|(holder, desc)| (holder, desc.clone()));

        match found {
            Some((_, PropertyDescriptor::Accessor { set: Some(setter), .. })) => {
                self.invoke(
                    setter,
                    CallShape::Method {
                        base: Value::Object(obj),
                    },
                    &[value],
                )?;
                Ok(())
            }
            Some((_, PropertyDescriptor::Accessor { set: None, .. })) => {
                self.reject_write(&key, "accessor has no setter")
            }
            Some((_, PropertyDescriptor::Data {
                writable: false, ..
            })) => self.reject_write(&key, "property is not writable"),
            Some((holder, PropertyDescriptor::Data { .. })) if holder == obj => {
                let record = self.graph.record_mut(obj)?;
                if let Some(PropertyDescriptor::Data { value: slot, .. }) =
                    record.properties.get_own_mut(&key)
                {
                    *slot = value;
                }
                Ok(())
            }
            inherited_or_missing => {
                let record = self.graph.record_mut(obj)?;
                if !record.is_extensible() {
                    return self.reject_write(&key, "object is not extensible");
                }
                if inherited_or_missing.is_some() {
                    tracing::trace!(%key, object = %obj, "shadowing inherited property");
                }
                record
                    .properties
                    .set_own(key, PropertyDescriptor::data(value));
                Ok(())
            }
        }
    }

    /// Assignment on an arbitrary value (`base.key = value`)
    pub fn put_value(
        &mut self,
        base: &Value,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let key = key.into();
        match base {
            Value::Object(obj) => self.put(*obj, key, value),
            Value::Undefined | Value::Null => Err(ModelError::type_error(format!(
                "Cannot set properties of {:?} (setting '{}')",
                base, key
            ))),
            _ => self.reject_write(&key, "primitive values have no own properties"),
        }
    }

    /// `[[HasProperty]]` (the `in` operator): own or inherited, enumerable or not
    pub fn has_property(&self, obj: ObjectId, key: impl Into<PropertyKey>) -> Result<bool, ModelError> {
        let key = key.into();
        Ok(self.graph.find_property(obj, &key)?.is_some())
    }

    /// `hasOwnProperty`: the prototype chain is not consulted
    pub fn has_own_property(&self, obj: ObjectId, key: impl Into<PropertyKey>) -> Result<bool, ModelError> {
        let key = key.into();
        Ok(self.graph.record(obj)?.properties.contains(&key))
    }

    /// `propertyIsEnumerable`: own and enumerable
    pub fn property_is_enumerable(
        &self,
        obj: ObjectId,
        key: impl Into<PropertyKey>,
    ) -> Result<bool, ModelError> {
        let key = key.into();
        Ok(self
            .graph
            .record(obj)?
            .properties
            .get_own(&key)
            .is_some_and(PropertyDescriptor::enumerable))
    }

    pub fn get_own_property_descriptor(
        &self,
        obj: ObjectId,
        key: impl Into<PropertyKey>,
    ) -> Result<Option<PropertyDescriptor>, ModelError> {
        let key = key.into();
        Ok(self.graph.record(obj)?.properties.get_own(&key).cloned())
    }

    /// `Object.keys`: own, enumerable, string-keyed
    pub fn keys(&self, obj: ObjectId) -> Result<Vec<PropertyKey>, ModelError> {
        Ok(self
            .graph
            .record(obj)?
            .properties
            .keys(false)
            .filter(|key| !key.is_symbol())
            .cloned()
            .collect())
    }

    /// `Object.getOwnPropertyNames`: every own string key, enumerable or not
    pub fn own_property_names(&self, obj: ObjectId) -> Result<Vec<PropertyKey>, ModelError> {
        Ok(self
            .graph
            .record(obj)?
            .properties
            .keys(true)
            .filter(|key| !key.is_symbol())
            .cloned()
            .collect())
    }

    /// `Object.getOwnPropertySymbols`
    pub fn own_property_symbols(&self, obj: ObjectId) -> Result<Vec<PropertyKey>, ModelError> {
        Ok(self
            .graph
            .record(obj)?
            .properties
            .keys(true)
            .filter(|key| key.is_symbol())
            .cloned()
            .collect())
    }

    /// Every own key: strings first, then symbols, each in insertion order
    pub fn own_property_keys(&self, obj: ObjectId) -> Result<Vec<PropertyKey>, ModelError> {
        let mut keys = self.own_property_names(obj)?;
        keys.extend(self.own_property_symbols(obj)?);
        Ok(keys)
    }
}
