//! JSON fixtures: build object graphs from JSON and snapshot them back
//!
//! Objects come out as ordinary objects linked to `Object.prototype`, with
//! data properties in source order. Arrays come out array-like: index keys
//! plus a non-enumerable `length`.

use serde_json::{Map, Number, Value as Json};

use crate::error::ModelError;
use crate::object::ObjectId;
use crate::prelude::{IndexSet, index_set_new};
use crate::property::{DescriptorPatch, PropertyDescriptor, PropertyKey};
use crate::realm::{Realm, RealmConfig};
use crate::value::Value;

impl RealmConfig {
    /// Parse a configuration such as `{"write_policy": "strict"}`.
    /// Missing fields keep their defaults.
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(source)?)
    }
}

impl Realm {
    pub fn value_from_json(&mut self, json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::from(s.as_str()),
            Json::Array(items) => {
                let obj = self.create_object();
                for (index, item) in items.iter().enumerate() {
                    let value = self.value_from_json(item);
                    self.init_property(obj, PropertyKey::from(index), PropertyDescriptor::data(value));
                }
                self.init_property(
                    obj,
                    PropertyKey::from("length"),
                    PropertyDescriptor::with_attributes(
                        Value::Number(items.len() as f64),
                        true,
                        false,
                        false,
                    ),
                );
                Value::Object(obj)
            }
            Json::Object(fields) => {
                let obj = self.create_object();
                for (key, field) in fields {
                    let value = self.value_from_json(field);
                    self.init_property(obj, PropertyKey::from(key.as_str()), PropertyDescriptor::data(value));
                }
                Value::Object(obj)
            }
        }
    }

    pub fn value_from_json_str(&mut self, source: &str) -> Result<Value, ModelError> {
        let json: Json = serde_json::from_str(source)?;
        Ok(self.value_from_json(&json))
    }

    /// Snapshot a value the way `JSON.stringify` sees it: own enumerable
    /// string keys, read through getters. Functions, symbols and `undefined`
    /// are left out.
    pub fn value_to_json(&mut self, value: &Value) -> Result<Json, ModelError> {
        let mut stack = index_set_new();
        Ok(self.to_json_inner(value, &mut stack)?.unwrap_or(Json::Null))
    }

    fn to_json_inner(
        &mut self,
        value: &Value,
        stack: &mut IndexSet<ObjectId>,
    ) -> Result<Option<Json>, ModelError> {
        let obj = match value {
            Value::Undefined | Value::Symbol(_) => return Ok(None),
            Value::Null => return Ok(Some(Json::Null)),
            Value::Boolean(b) => return Ok(Some(Json::Bool(*b))),
            // NaN and the infinities have no JSON form
            Value::Number(n) => return Ok(Some(Number::from_f64(*n).map_or(Json::Null, Json::Number))),
            Value::String(s) => return Ok(Some(Json::String(s.to_string()))),
            Value::Object(obj) => *obj,
        };
        if self.graph.record(obj)?.is_callable() {
            return Ok(None);
        }
        if !stack.insert(obj) {
            return Err(ModelError::type_error("Converting circular structure to JSON"));
        }

        let mut fields = Map::new();
        for key in self.keys(obj)? {
            let field = self.get(obj, key.clone())?;
            if let Some(json) = self.to_json_inner(&field, stack)? {
                fields.insert(key.to_string(), json);
            }
        }

        stack.pop();
        Ok(Some(Json::Object(fields)))
    }

    /// Describe a descriptor as JSON. Accessor functions are shown by name.
    pub fn descriptor_to_json(&mut self, desc: &PropertyDescriptor) -> Result<Json, ModelError> {
        let mut fields = Map::new();
        match desc {
            PropertyDescriptor::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => {
                fields.insert("value".into(), self.value_to_json(value)?);
                fields.insert("writable".into(), Json::Bool(*writable));
                fields.insert("enumerable".into(), Json::Bool(*enumerable));
                fields.insert("configurable".into(), Json::Bool(*configurable));
            }
            PropertyDescriptor::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => {
                fields.insert("get".into(), self.function_name_json(*get)?);
                fields.insert("set".into(), self.function_name_json(*set)?);
                fields.insert("enumerable".into(), Json::Bool(*enumerable));
                fields.insert("configurable".into(), Json::Bool(*configurable));
            }
        }
        Ok(Json::Object(fields))
    }

    fn function_name_json(&self, func: Option<ObjectId>) -> Result<Json, ModelError> {
        let Some(func) = func else {
            return Ok(Json::Null);
        };
        let name = self
            .graph
            .record(func)?
            .as_function()
            .map(|f| f.name().to_string())
            .unwrap_or_default();
        Ok(Json::String(name))
    }

    /// Read a data or generic descriptor patch:
    /// `{"value": .., "writable": .., "enumerable": .., "configurable": ..}`
    ///
    /// Functions cannot be written in JSON, so `get`/`set` are rejected.
    pub fn patch_from_json(&mut self, json: &Json) -> Result<DescriptorPatch, ModelError> {
        let Json::Object(fields) = json else {
            return Err(ModelError::type_error("Property description must be an object"));
        };

        let mut patch = DescriptorPatch::new();
        for (name, field) in fields {
            match name.as_str() {
                "value" => patch.value = Some(self.value_from_json(field)),
                "writable" => patch.writable = Some(json_flag(name, field)?),
                "enumerable" => patch.enumerable = Some(json_flag(name, field)?),
                "configurable" => patch.configurable = Some(json_flag(name, field)?),
                "get" | "set" => {
                    return Err(ModelError::type_error(format!(
                        "'{}' cannot be given in a JSON descriptor",
                        name
                    )));
                }
                _ => {}
            }
        }
        Ok(patch)
    }
}

fn json_flag(name: &str, field: &Json) -> Result<bool, ModelError> {
    field
        .as_bool()
        .ok_or_else(|| ModelError::type_error(format!("'{}' must be a boolean", name)))
}
