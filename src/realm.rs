//! The realm: one object graph plus its intrinsics and configuration

use std::rc::Rc;

use crate::builtins;
use crate::error::ModelError;
use crate::object::{JsFunction, NativeFn, ObjectGraph, ObjectId, ObjectKind, ObjectRecord};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::scope::ScopeArena;
use crate::value::{JsString, Symbol, Value};

/// What happens when a write is rejected (non-writable target, missing
/// setter, non-extensible object)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum WritePolicy {
    /// Leave state unchanged and return normally (non-strict semantics)
    #[default]
    Silent,
    /// Raise `TypeConflict` (strict-mode semantics)
    Strict,
}

/// Realm configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct RealmConfig {
    pub write_policy: WritePolicy,
}

/// A realm owns an object graph together with the intrinsic objects every
/// ordinary object and function links to.
///
/// Operations are spread over several modules as `impl Realm` blocks:
/// [`lookup`](crate::lookup), [`mutator`](crate::mutator),
/// [`binder`](crate::binder), [`iteration`](crate::iteration) and
/// [`scope`](crate::scope).
pub struct Realm {
    pub(crate) graph: ObjectGraph,
    pub(crate) scopes: ScopeArena,
    config: RealmConfig,
    object_prototype: ObjectId,
    function_prototype: ObjectId,
    symbol_iterator: Symbol,
    next_symbol_id: u64,
}

impl Realm {
    pub fn new() -> Self {
        Self::with_config(RealmConfig::default())
    }

    pub fn with_config(config: RealmConfig) -> Self {
        let mut graph = ObjectGraph::new();
        let object_prototype = graph.alloc_root(ObjectKind::Ordinary);
        let function_prototype = graph.alloc_child(object_prototype, ObjectKind::Ordinary);

        let mut realm = Self {
            graph,
            scopes: ScopeArena::new(),
            config,
            object_prototype,
            function_prototype,
            symbol_iterator: Symbol::new(0, Some(JsString::from("Symbol.iterator"))),
            next_symbol_id: 1,
        };
        builtins::init_object_prototype(&mut realm);
        builtins::init_function_prototype(&mut realm);
        realm
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// Read-only view of the object graph
    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    pub fn record(&self, obj: ObjectId) -> Result<&ObjectRecord, ModelError> {
        self.graph.record(obj)
    }

    /// `Object.prototype`
    pub fn object_prototype(&self) -> ObjectId {
        self.object_prototype
    }

    /// `Function.prototype`
    pub fn function_prototype(&self) -> ObjectId {
        self.function_prototype
    }

    /// The well-known `@@iterator` symbol
    pub fn symbol_iterator(&self) -> Symbol {
        self.symbol_iterator.clone()
    }

    /// Create a fresh symbol, distinct from every other symbol of this realm
    pub fn create_symbol(&mut self, description: Option<&str>) -> Symbol {
        let id = self.next_symbol_id;
        self.next_symbol_id += 1;
        Symbol::new(id, description.map(JsString::from))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Object Graph
    // ═══════════════════════════════════════════════════════════════════════════

    /// Allocate an empty object linked to `Object.prototype`, as an object
    /// literal would be
    pub fn create_object(&mut self) -> ObjectId {
        self.graph.alloc_child(self.object_prototype, ObjectKind::Ordinary)
    }

    /// Allocate an empty object with the given prototype (`Object.create`)
    pub fn create_object_with_proto(
        &mut self,
        prototype: Option<ObjectId>,
    ) -> Result<ObjectId, ModelError> {
        self.graph.create(prototype)
    }

    /// Allocate an object literal: data properties that are writable,
    /// enumerable and configurable, in the given order
    pub fn create_object_from<K, V>(
        &mut self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> ObjectId
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let obj = self.create_object();
        for (key, value) in entries {
            self.init_property(obj, key.into(), PropertyDescriptor::data(value.into()));
        }
        obj
    }

    pub fn prototype_of(&self, obj: ObjectId) -> Result<Option<ObjectId>, ModelError> {
        self.graph.prototype_of(obj)
    }

    pub fn is_prototype_of(&self, candidate: ObjectId, obj: ObjectId) -> Result<bool, ModelError> {
        self.graph.is_prototype_of(candidate, obj)
    }

    /// Set an own descriptor while building an object, bypassing the
    /// descriptor validation. Only for objects the realm just allocated.
    pub(crate) fn init_property(&mut self, obj: ObjectId, key: PropertyKey, desc: PropertyDescriptor) {
        if let Ok(record) = self.graph.record_mut(obj) {
            record.properties.set_own(key, desc);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Functions
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create an ordinary (receiver-taking, constructible) function.
    ///
    /// Like a function declaration, it owns a `prototype` object whose
    /// non-enumerable `constructor` points back at the function.
    pub fn create_function<F>(&mut self, name: &str, body: F) -> ObjectId
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ModelError> + 'static,
    {
        let func = self.alloc_function(JsFunction::Ordinary {
            name: JsString::from(name),
            body: Rc::new(body),
        });
        self.init_function_name(func, name);

        let proto = self.create_object();
        self.init_property(
            proto,
            PropertyKey::from("constructor"),
            PropertyDescriptor::with_attributes(Value::Object(func), true, false, true),
        );
        self.init_property(
            func,
            PropertyKey::from("prototype"),
            PropertyDescriptor::with_attributes(Value::Object(proto), true, false, false),
        );
        func
    }

    /// Create an arrow function closed over `lexical_this`, the receiver of
    /// the enclosing non-arrow function at creation time
    pub fn create_arrow_function<F>(&mut self, lexical_this: Value, body: F) -> ObjectId
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ModelError> + 'static,
    {
        let func = self.alloc_function(JsFunction::Arrow {
            name: JsString::from(""),
            lexical_this,
            body: Rc::new(body),
        });
        self.init_function_name(func, "");
        func
    }

    /// Create a method (shorthand method, getter or setter): it takes a
    /// receiver like an ordinary function but cannot be constructed and has no
    /// `prototype` object
    pub fn create_method<F>(&mut self, name: &str, body: F) -> ObjectId
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ModelError> + 'static,
    {
        self.create_native_method(name, Rc::new(body))
    }

    pub(crate) fn create_native_method(&mut self, name: &str, body: NativeFn) -> ObjectId {
        let func = self.alloc_function(JsFunction::Method {
            name: JsString::from(name),
            body,
        });
        self.init_function_name(func, name);
        func
    }

    /// Register a native method on an object as a non-enumerable property
    pub(crate) fn register_method(&mut self, obj: ObjectId, name: &str, body: NativeFn) {
        let func = self.create_native_method(name, body);
        self.init_property(
            obj,
            PropertyKey::from(name),
            PropertyDescriptor::with_attributes(Value::Object(func), true, false, true),
        );
    }

    pub(crate) fn alloc_function(&mut self, func: JsFunction) -> ObjectId {
        self.graph
            .alloc_child(self.function_prototype, ObjectKind::Function(func))
    }

    fn init_function_name(&mut self, func: ObjectId, name: &str) {
        self.init_property(
            func,
            PropertyKey::from("name"),
            PropertyDescriptor::with_attributes(Value::from(name), false, false, true),
        );
    }

    /// Whether `value` is a function object of this realm
    pub fn is_callable(&self, value: &Value) -> bool {
        match value {
            Value::Object(id) => self
                .graph
                .record(*id)
                .map(ObjectRecord::is_callable)
                .unwrap_or(false),
            _ => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Write policy
    // ═══════════════════════════════════════════════════════════════════════════

    /// A write was refused. Under the silent policy this is a no-op,
    /// under the strict policy it becomes a `TypeConflict`.
    pub(crate) fn reject_write(&self, key: &PropertyKey, reason: &str) -> Result<(), ModelError> {
        match self.config.write_policy {
            WritePolicy::Silent => {
                tracing::trace!(%key, reason, "write ignored");
                Ok(())
            }
            WritePolicy::Strict => Err(ModelError::type_conflict(key, reason)),
        }
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}
