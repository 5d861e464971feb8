//! Object records and the arena that owns them
//!
//! Every object lives in [`ObjectGraph`] and is addressed by an [`ObjectId`].
//! The prototype link is fixed when the object is allocated and must point at
//! an object that already exists, so a prototype's id is always smaller than
//! the id of any object inheriting from it. Chains are therefore finite and
//! acyclic without any runtime cycle check.

use std::fmt;
use std::rc::Rc;

use crate::error::ModelError;
use crate::property::{PropertyDescriptor, PropertyKey, PropertyStore};
use crate::realm::Realm;
use crate::value::{JsString, Value};

/// Handle to an object in a realm's graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn from_index(index: usize) -> Self {
        ObjectId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host-provided function body: `(realm, this, args) -> result`
pub type NativeFn = Rc<dyn Fn(&mut Realm, Value, &[Value]) -> Result<Value, ModelError>>;

/// Function representation
#[derive(Clone)]
pub enum JsFunction {
    /// Receiver-taking function; participates in all binding rules and can be
    /// constructed
    Ordinary { name: JsString, body: NativeFn },
    /// Receiver-taking but not constructible: method shorthand, accessor
    /// functions and the realm's built-in methods
    Method { name: JsString, body: NativeFn },
    /// Arrow function; the receiver was captured when it was created
    Arrow {
        name: JsString,
        lexical_this: Value,
        body: NativeFn,
    },
    /// Bound function (created by `bind`)
    Bound(Box<BoundFunctionData>),
}

/// Data for a bound function
#[derive(Debug, Clone)]
pub struct BoundFunctionData {
    /// The target function to call
    pub target: ObjectId,
    /// The bound this value, fixed for the lifetime of the function
    pub this_arg: Value,
    /// Pre-filled arguments
    pub bound_args: Vec<Value>,
}

impl JsFunction {
    pub fn name(&self) -> &str {
        match self {
            JsFunction::Ordinary { name, .. }
            | JsFunction::Method { name, .. }
            | JsFunction::Arrow { name, .. } => name.as_str(),
            JsFunction::Bound(_) => "bound",
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, JsFunction::Arrow { .. })
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsFunction::Ordinary { name, .. } => write!(f, "[Function: {}]", name),
            JsFunction::Method { name, .. } => write!(f, "[Method: {}]", name),
            JsFunction::Arrow {
                name, lexical_this, ..
            } => write!(f, "[Arrow: {} this={:?}]", name, lexical_this),
            JsFunction::Bound(data) => f
                .debug_struct("BoundFunction")
                .field("target", &data.target)
                .field("this_arg", &data.this_arg)
                .finish(),
        }
    }
}

/// Object kind
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Ordinary,
    Function(JsFunction),
}

/// An object: own properties, prototype link, extensibility
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    prototype: Option<ObjectId>,
    /// Whether the object can have properties added. Only ever goes from
    /// true to false.
    extensible: bool,
    pub properties: PropertyStore,
    pub kind: ObjectKind,
}

impl ObjectRecord {
    fn new(prototype: Option<ObjectId>, kind: ObjectKind) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: PropertyStore::new(),
            kind,
        }
    }

    /// Prototype link (read-only: there is no re-parenting)
    pub fn prototype(&self) -> Option<ObjectId> {
        self.prototype
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// Clear the extensible flag. Irreversible.
    pub(crate) fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn as_function(&self) -> Option<&JsFunction> {
        match &self.kind {
            ObjectKind::Function(func) => Some(func),
            ObjectKind::Ordinary => None,
        }
    }
}

/// Arena of object records
#[derive(Debug, Default)]
pub struct ObjectGraph {
    objects: Vec<ObjectRecord>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an ordinary object linked to `prototype`
    pub fn create(&mut self, prototype: Option<ObjectId>) -> Result<ObjectId, ModelError> {
        self.alloc(prototype, ObjectKind::Ordinary)
    }

    /// Allocate an object of the given kind. The prototype must already be
    /// part of this graph.
    pub fn alloc(
        &mut self,
        prototype: Option<ObjectId>,
        kind: ObjectKind,
    ) -> Result<ObjectId, ModelError> {
        if let Some(proto) = prototype {
            self.record(proto)?;
        }
        Ok(self.push(prototype, kind))
    }

    /// Allocate an object with no prototype
    pub(crate) fn alloc_root(&mut self, kind: ObjectKind) -> ObjectId {
        self.push(None, kind)
    }

    /// Allocate an object under a prototype the caller knows is live
    /// (realm intrinsics, freshly allocated objects)
    pub(crate) fn alloc_child(&mut self, prototype: ObjectId, kind: ObjectKind) -> ObjectId {
        debug_assert!(prototype.index() < self.objects.len());
        self.push(Some(prototype), kind)
    }

    fn push(&mut self, prototype: Option<ObjectId>, kind: ObjectKind) -> ObjectId {
        let id = ObjectId::from_index(self.objects.len());
        self.objects.push(ObjectRecord::new(prototype, kind));
        tracing::trace!(object = %id, prototype = ?prototype, "allocated object");
        id
    }

    pub fn record(&self, id: ObjectId) -> Result<&ObjectRecord, ModelError> {
        self.objects
            .get(id.index())
            .ok_or(ModelError::UnknownObject(id))
    }

    pub fn record_mut(&mut self, id: ObjectId) -> Result<&mut ObjectRecord, ModelError> {
        self.objects
            .get_mut(id.index())
            .ok_or(ModelError::UnknownObject(id))
    }

    pub fn prototype_of(&self, obj: ObjectId) -> Result<Option<ObjectId>, ModelError> {
        Ok(self.record(obj)?.prototype())
    }

    /// True iff `candidate` appears in `obj`'s prototype chain, excluding
    /// `obj` itself
    pub fn is_prototype_of(&self, candidate: ObjectId, obj: ObjectId) -> Result<bool, ModelError> {
        let mut current = self.prototype_of(obj)?;
        while let Some(proto) = current {
            if proto == candidate {
                return Ok(true);
            }
            current = self.prototype_of(proto)?;
        }
        Ok(false)
    }

    /// `obj` followed by each of its prototypes
    pub fn chain(&self, obj: ObjectId) -> PrototypeChain<'_> {
        PrototypeChain {
            graph: self,
            next: Some(obj),
        }
    }

    /// Find the first own descriptor for `key` along the chain.
    /// Returns the object holding it along with the descriptor.
    pub fn find_property(
        &self,
        obj: ObjectId,
        key: &PropertyKey,
    ) -> Result<Option<(ObjectId, &PropertyDescriptor)>, ModelError> {
        let mut current = Some(obj);
        while let Some(id) = current {
            let record = self.record(id)?;
            if let Some(desc) = record.properties.get_own(key) {
                return Ok(Some((id, desc)));
            }
            current = record.prototype();
        }
        Ok(None)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Iterator over an object and its prototypes, most-derived first
pub struct PrototypeChain<'g> {
    graph: &'g ObjectGraph,
    next: Option<ObjectId>,
}

impl Iterator for PrototypeChain<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        let current = self.next?;
        // An unknown handle ends the chain; callers validate the start object
        self.next = self
            .graph
            .record(current)
            .ok()
            .and_then(ObjectRecord::prototype);
        Some(current)
    }
}
