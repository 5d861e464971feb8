//! Property keys, descriptors and the per-object property store

use std::fmt;

use crate::object::ObjectId;
use crate::prelude::{IndexMap, index_map_new};
use crate::value::{JsString, Symbol, Value};

/// Property key (string or symbol)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(JsString),
    Symbol(Symbol),
}

impl PropertyKey {
    /// Check if this is a symbol key
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// Property key for a value used in a computed member access
    ///
    /// Only the primitive-to-string conversions this model needs are covered.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Symbol(s) => PropertyKey::Symbol(s.clone()),
            other => PropertyKey::String(other.to_js_string()),
        }
    }

    /// The key as a value (what `Object.keys` would hand out)
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(s) => Value::String(s.clone()),
            PropertyKey::Symbol(s) => Value::Symbol(s.clone()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(JsString::from(s))
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(JsString::from(s))
    }
}

impl From<JsString> for PropertyKey {
    fn from(s: JsString) -> Self {
        PropertyKey::String(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(s: Symbol) -> Self {
        PropertyKey::Symbol(s)
    }
}

impl From<&Symbol> for PropertyKey {
    fn from(s: &Symbol) -> Self {
        PropertyKey::Symbol(s.clone())
    }
}

impl From<usize> for PropertyKey {
    fn from(index: usize) -> Self {
        PropertyKey::String(JsString::from(index.to_string()))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// Property descriptor
///
/// A descriptor is either a data descriptor or an accessor descriptor, never
/// both; the enum makes the mixed state unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyDescriptor {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<ObjectId>,
        set: Option<ObjectId>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyDescriptor {
    /// A data property as created by assignment or an object literal:
    /// writable, enumerable and configurable.
    pub fn data(value: Value) -> Self {
        Self::with_attributes(value, true, true, true)
    }

    /// Create a data property with custom attributes
    pub fn with_attributes(
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        PropertyDescriptor::Data {
            value,
            writable,
            enumerable,
            configurable,
        }
    }

    /// An accessor property as written with `get`/`set` literal syntax:
    /// enumerable and configurable.
    pub fn accessor(get: Option<ObjectId>, set: Option<ObjectId>) -> Self {
        PropertyDescriptor::Accessor {
            get,
            set,
            enumerable: true,
            configurable: true,
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, PropertyDescriptor::Accessor { .. })
    }

    pub fn enumerable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { enumerable, .. }
            | PropertyDescriptor::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn configurable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { configurable, .. }
            | PropertyDescriptor::Accessor { configurable, .. } => *configurable,
        }
    }

    /// Writability; accessors have no such attribute and report `None`
    pub fn writable(&self) -> Option<bool> {
        match self {
            PropertyDescriptor::Data { writable, .. } => Some(*writable),
            PropertyDescriptor::Accessor { .. } => None,
        }
    }

    /// The stored value of a data property
    pub fn value(&self) -> Option<&Value> {
        match self {
            PropertyDescriptor::Data { value, .. } => Some(value),
            PropertyDescriptor::Accessor { .. } => None,
        }
    }

    pub fn set_enumerable(&mut self, flag: bool) {
        match self {
            PropertyDescriptor::Data { enumerable, .. }
            | PropertyDescriptor::Accessor { enumerable, .. } => *enumerable = flag,
        }
    }

    pub fn set_configurable(&mut self, flag: bool) {
        match self {
            PropertyDescriptor::Data { configurable, .. }
            | PropertyDescriptor::Accessor { configurable, .. } => *configurable = flag,
        }
    }

    /// Set writability of a data property; accessors are left untouched
    pub fn set_writable(&mut self, flag: bool) {
        if let PropertyDescriptor::Data { writable, .. } = self {
            *writable = flag;
        }
    }
}

/// A partial descriptor, as passed to `defineProperty`
///
/// Absent fields mean "leave as is" for an existing property and
/// `false`/`undefined` for a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorPatch {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    /// `Some(None)` explicitly sets the getter to undefined
    pub get: Option<Option<ObjectId>>,
    pub set: Option<Option<ObjectId>>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl DescriptorPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn writable(mut self, flag: bool) -> Self {
        self.writable = Some(flag);
        self
    }

    pub fn getter(mut self, get: ObjectId) -> Self {
        self.get = Some(Some(get));
        self
    }

    pub fn setter(mut self, set: ObjectId) -> Self {
        self.set = Some(Some(set));
        self
    }

    pub fn enumerable(mut self, flag: bool) -> Self {
        self.enumerable = Some(flag);
        self
    }

    pub fn configurable(mut self, flag: bool) -> Self {
        self.configurable = Some(flag);
        self
    }

    /// Names `value` or `writable`
    pub fn is_data(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// Names `get` or `set`
    pub fn is_accessor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// Names neither data nor accessor fields
    pub fn is_generic(&self) -> bool {
        !self.is_data() && !self.is_accessor()
    }

    /// Build the descriptor for a property that does not exist yet.
    ///
    /// Unspecified attributes default to `false`, the value to `undefined`.
    pub(crate) fn to_new_descriptor(&self) -> PropertyDescriptor {
        let enumerable = self.enumerable.unwrap_or(false);
        let configurable = self.configurable.unwrap_or(false);
        if self.is_accessor() {
            PropertyDescriptor::Accessor {
                get: self.get.flatten(),
                set: self.set.flatten(),
                enumerable,
                configurable,
            }
        } else {
            PropertyDescriptor::Data {
                value: self.value.clone().unwrap_or_default(),
                writable: self.writable.unwrap_or(false),
                enumerable,
                configurable,
            }
        }
    }

    /// Merge this patch into an existing descriptor. Validation happens
    /// before this is called.
    pub(crate) fn apply_to(&self, current: &mut PropertyDescriptor) {
        let enumerable = self.enumerable.unwrap_or(current.enumerable());
        let configurable = self.configurable.unwrap_or(current.configurable());

        let replacement = match current {
            PropertyDescriptor::Data {
                value, writable, ..
            } if !self.is_accessor() => {
                if let Some(v) = &self.value {
                    *value = v.clone();
                }
                if let Some(w) = self.writable {
                    *writable = w;
                }
                None
            }
            PropertyDescriptor::Accessor { get, set, .. } if !self.is_data() => {
                if let Some(g) = self.get {
                    *get = g;
                }
                if let Some(s) = self.set {
                    *set = s;
                }
                None
            }
            // Kind change: keep enumerable/configurable, default the rest
            PropertyDescriptor::Data { .. } => Some(PropertyDescriptor::Accessor {
                get: self.get.flatten(),
                set: self.set.flatten(),
                enumerable,
                configurable,
            }),
            PropertyDescriptor::Accessor { .. } => Some(PropertyDescriptor::Data {
                value: self.value.clone().unwrap_or_default(),
                writable: self.writable.unwrap_or(false),
                enumerable,
                configurable,
            }),
        };
        if let Some(replacement) = replacement {
            *current = replacement;
        }

        current.set_enumerable(enumerable);
        current.set_configurable(configurable);
    }
}

impl From<PropertyDescriptor> for DescriptorPatch {
    fn from(desc: PropertyDescriptor) -> Self {
        match desc {
            PropertyDescriptor::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => DescriptorPatch {
                value: Some(value),
                writable: Some(writable),
                get: None,
                set: None,
                enumerable: Some(enumerable),
                configurable: Some(configurable),
            },
            PropertyDescriptor::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => DescriptorPatch {
                value: None,
                writable: None,
                get: Some(get),
                set: Some(set),
                enumerable: Some(enumerable),
                configurable: Some(configurable),
            },
        }
    }
}

/// Own properties of a single object, in insertion order
#[derive(Debug, Clone)]
pub struct PropertyStore {
    entries: IndexMap<PropertyKey, PropertyDescriptor>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self {
            entries: index_map_new(),
        }
    }

    pub fn get_own(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.entries.get(key)
    }

    pub fn get_own_mut(&mut self, key: &PropertyKey) -> Option<&mut PropertyDescriptor> {
        self.entries.get_mut(key)
    }

    /// Insert or overwrite. Overwriting keeps the key's original position.
    pub fn set_own(&mut self, key: PropertyKey, descriptor: PropertyDescriptor) {
        self.entries.insert(key, descriptor);
    }

    /// Remove a key, keeping the order of the remaining keys
    pub fn remove(&mut self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order, optionally skipping non-enumerable ones
    pub fn keys(&self, include_non_enumerable: bool) -> impl Iterator<Item = &PropertyKey> + '_ {
        self.entries
            .iter()
            .filter(move |(_, desc)| include_non_enumerable || desc.enumerable())
            .map(|(key, _)| key)
    }

    /// Entry at an insertion position
    pub fn get_index(&self, index: usize) -> Option<(&PropertyKey, &PropertyDescriptor)> {
        self.entries.get_index(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &PropertyDescriptor)> + '_ {
        self.entries.iter()
    }

    pub fn descriptors_mut(&mut self) -> impl Iterator<Item = &mut PropertyDescriptor> + '_ {
        self.entries.values_mut()
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}
