//! Reference interpreter for a prototype-based object model
//!
//! Given a described object graph, predicts what a property read, a property
//! write or a method dispatch does: descriptors and their constraints,
//! prototype inheritance, receiver ("this") binding and the iteration
//! protocols.
//!
//! # Example
//!
//! ```
//! use objmodel::{DescriptorPatch, Realm, Value};
//!
//! let mut realm = Realm::new();
//! let obj = realm.create_object_from([("a", 2)]);
//! realm.freeze(obj).unwrap();
//!
//! // Writes to a frozen object are ignored
//! realm.put(obj, "a", 3).unwrap();
//! assert_eq!(realm.get(obj, "a").unwrap(), Value::from(2));
//!
//! // Redefinitions are not
//! let err = realm
//!     .define_property(obj, "a", DescriptorPatch::new().value(3))
//!     .unwrap_err();
//! assert!(err.is_type_conflict());
//! ```

pub mod binder;
pub mod builtins;
pub mod error;
pub mod iteration;
#[cfg(feature = "json")]
pub mod json;
pub mod lookup;
pub mod mutator;
pub mod object;
pub mod prelude;
pub mod property;
pub mod realm;
pub mod scope;
pub mod value;

pub use binder::{BindingRule, CallExpression, CallShape, Receiver, ReceiverBinding};
pub use error::ModelError;
pub use iteration::{EnumerableKeys, IterResult, IteratorRecord};
pub use object::{JsFunction, NativeFn, ObjectGraph, ObjectId, ObjectKind, ObjectRecord};
pub use property::{DescriptorPatch, PropertyDescriptor, PropertyKey, PropertyStore};
pub use realm::{Realm, RealmConfig, WritePolicy};
pub use scope::ScopeId;
pub use value::{CheapClone, JsString, Symbol, Value};
