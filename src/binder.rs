//! Call-site binding: which receiver ("this") a function runs with
//!
//! The call site is reified as a [`CallShape`] instead of being inferred from
//! interpreter state. Precedence, highest first:
//!
//! 1. `new f()` allocates a fresh object linked to `f.prototype`
//! 2. a receiver fixed by `bind` overrides anything the call site supplies
//! 3. `f.call(x)` / `f.apply(x, ..)` use `x`
//! 4. `base.f()` uses `base` (only the last member access counts)
//! 5. `f()` gets no receiver at all
//!
//! Arrow functions opt out entirely and keep the receiver they captured.

use crate::error::ModelError;
use crate::object::{BoundFunctionData, JsFunction, NativeFn, ObjectId, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::realm::Realm;
use crate::value::{CheapClone, JsString, Value};

/// How a function is invoked at the call site
#[derive(Debug, Clone, PartialEq)]
pub enum CallShape {
    /// `f()`
    Bare,
    /// `base.f()`
    Method { base: Value },
    /// `f.call(this_arg)`, `f.apply(this_arg, args)`
    Explicit { this_arg: Value },
    /// `new f()`
    Construct,
}

/// A call expression: callee, call shape and arguments
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Value,
    pub shape: CallShape,
    pub args: Vec<Value>,
}

impl CallExpression {
    pub fn bare(callee: impl Into<Value>, args: Vec<Value>) -> Self {
        Self {
            callee: callee.into(),
            shape: CallShape::Bare,
            args,
        }
    }

    pub fn method(base: impl Into<Value>, callee: impl Into<Value>, args: Vec<Value>) -> Self {
        Self {
            callee: callee.into(),
            shape: CallShape::Method { base: base.into() },
            args,
        }
    }

    pub fn explicit(callee: impl Into<Value>, this_arg: impl Into<Value>, args: Vec<Value>) -> Self {
        Self {
            callee: callee.into(),
            shape: CallShape::Explicit {
                this_arg: this_arg.into(),
            },
            args,
        }
    }

    pub fn construct(callee: impl Into<Value>, args: Vec<Value>) -> Self {
        Self {
            callee: callee.into(),
            shape: CallShape::Construct,
            args,
        }
    }
}

/// The rule that decided the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingRule {
    New,
    /// Receiver fixed by `bind`
    Hard,
    /// `call`/`apply`
    Explicit,
    Implicit,
    Default,
    /// Arrow function: receiver captured at creation
    Lexical,
}

/// The receiver a call will run with
#[derive(Debug, Clone, PartialEq)]
pub enum Receiver {
    Value(Value),
    /// A fresh object with this prototype is allocated for the call
    Fresh { prototype: ObjectId },
    /// No receiver; the body sees `undefined`, never a global object
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverBinding {
    pub rule: BindingRule,
    pub receiver: Receiver,
}

#[derive(Clone)]
enum TargetKind {
    Ordinary,
    Method,
    Arrow { lexical_this: Value },
}

/// The function that actually runs once bound wrappers are peeled off
struct ResolvedTarget {
    target: ObjectId,
    kind: TargetKind,
    body: NativeFn,
    /// Receiver of the innermost `bind`
    bound_this: Option<Value>,
    /// Bound arguments of every wrapper, innermost first
    bound_args: Vec<Value>,
}

impl Realm {
    /// Decide the receiver for a call expression without running anything
    pub fn resolve_receiver(&self, call: &CallExpression) -> Result<ReceiverBinding, ModelError> {
        let callee = self.function_id(&call.callee)?;
        let resolved = self.resolve_target(callee)?;
        self.binding_for(&resolved, &call.shape)
    }

    /// Evaluate a call expression
    pub fn call(&mut self, call: CallExpression) -> Result<Value, ModelError> {
        let callee = self.function_id(&call.callee)?;
        self.invoke(callee, call.shape, &call.args)
    }

    /// `f.call(this, ...args)`
    pub fn call_function(
        &mut self,
        callee: &Value,
        this_arg: Value,
        args: &[Value],
    ) -> Result<Value, ModelError> {
        let callee = self.function_id(callee)?;
        self.invoke(callee, CallShape::Explicit { this_arg }, args)
    }

    /// `f(...args)`
    pub fn call_bare(&mut self, callee: &Value, args: &[Value]) -> Result<Value, ModelError> {
        let callee = self.function_id(callee)?;
        self.invoke(callee, CallShape::Bare, args)
    }

    /// `obj.key(...args)`: look the method up, then call it with `obj` as
    /// the implicit receiver
    pub fn call_method(
        &mut self,
        obj: ObjectId,
        key: impl Into<PropertyKey>,
        args: &[Value],
    ) -> Result<Value, ModelError> {
        let key = key.into();
        let method = self.get(obj, key.clone())?;
        if !self.is_callable(&method) {
            return Err(ModelError::not_callable(key));
        }
        let callee = self.function_id(&method)?;
        self.invoke(
            callee,
            CallShape::Method {
                base: Value::Object(obj),
            },
            args,
        )
    }

    /// `new f(...args)`
    pub fn construct(&mut self, callee: &Value, args: &[Value]) -> Result<Value, ModelError> {
        let callee = self.function_id(callee)?;
        self.invoke(callee, CallShape::Construct, args)
    }

    /// `f.bind(this, ...args)`: a new function whose receiver is fixed for good
    pub fn bind(
        &mut self,
        target: &Value,
        this_arg: Value,
        bound_args: Vec<Value>,
    ) -> Result<ObjectId, ModelError> {
        let target = self.function_id(target)?;
        let name = match self.graph.record(target)?.as_function() {
            Some(func) => format!("bound {}", func.name()),
            None => return Err(ModelError::not_callable(target)),
        };
        let bound = self.alloc_function(JsFunction::Bound(Box::new(BoundFunctionData {
            target,
            this_arg,
            bound_args,
        })));
        self.init_property(
            bound,
            PropertyKey::from("name"),
            PropertyDescriptor::with_attributes(Value::from(JsString::from(name)), false, false, true),
        );
        Ok(bound)
    }

    pub(crate) fn invoke(
        &mut self,
        callee: ObjectId,
        shape: CallShape,
        args: &[Value],
    ) -> Result<Value, ModelError> {
        let resolved = self.resolve_target(callee)?;
        let binding = self.binding_for(&resolved, &shape)?;
        tracing::trace!(function = %callee, rule = ?binding.rule, "resolved receiver");

        let mut full_args = resolved.bound_args;
        full_args.extend_from_slice(args);
        let body = resolved.body;

        match binding.receiver {
            Receiver::Fresh { prototype } => {
                let this = self.graph.alloc(Some(prototype), ObjectKind::Ordinary)?;
                let result = body(self, Value::Object(this), &full_args)?;
                // An object returned from a constructor replaces the fresh one
                Ok(match result {
                    Value::Object(_) => result,
                    _ => Value::Object(this),
                })
            }
            Receiver::Value(this) => body(self, this, &full_args),
            Receiver::Absent => body(self, Value::Undefined, &full_args),
        }
    }

    fn function_id(&self, callee: &Value) -> Result<ObjectId, ModelError> {
        match callee {
            Value::Object(id) if self.graph.record(*id)?.is_callable() => Ok(*id),
            _ => Err(ModelError::not_callable(format!("{:?}", callee))),
        }
    }

    fn resolve_target(&self, callee: ObjectId) -> Result<ResolvedTarget, ModelError> {
        let mut current = callee;
        let mut bound_this = None;
        let mut bound_args = Vec::new();

        loop {
            let func = self
                .graph
                .record(current)?
                .as_function()
                .ok_or_else(|| ModelError::not_callable(current))?;

            let (kind, body) = match func {
                JsFunction::Bound(data) => {
                    // Peeling outside-in: inner arguments go first, the
                    // innermost receiver wins
                    let mut args = data.bound_args.clone();
                    args.append(&mut bound_args);
                    bound_args = args;
                    bound_this = Some(data.this_arg.clone());
                    current = data.target;
                    continue;
                }
                JsFunction::Ordinary { body, .. } => (TargetKind::Ordinary, body.cheap_clone()),
                JsFunction::Method { body, .. } => (TargetKind::Method, body.cheap_clone()),
                JsFunction::Arrow {
                    lexical_this, body, ..
                } => (
                    TargetKind::Arrow {
                        lexical_this: lexical_this.clone(),
                    },
                    body.cheap_clone(),
                ),
            };

            return Ok(ResolvedTarget {
                target: current,
                kind,
                body,
                bound_this,
                bound_args,
            });
        }
    }

    fn binding_for(
        &self,
        resolved: &ResolvedTarget,
        shape: &CallShape,
    ) -> Result<ReceiverBinding, ModelError> {
        if let CallShape::Construct = shape {
            if !matches!(resolved.kind, TargetKind::Ordinary) {
                return Err(ModelError::not_constructor(resolved.target));
            }
            // Constructing through a bound function ignores its receiver
            return Ok(ReceiverBinding {
                rule: BindingRule::New,
                receiver: Receiver::Fresh {
                    prototype: self.designated_prototype(resolved.target)?,
                },
            });
        }

        if let TargetKind::Arrow { lexical_this } = &resolved.kind {
            return Ok(ReceiverBinding {
                rule: BindingRule::Lexical,
                receiver: Receiver::Value(lexical_this.clone()),
            });
        }

        if let Some(this) = &resolved.bound_this {
            return Ok(ReceiverBinding {
                rule: BindingRule::Hard,
                receiver: Receiver::Value(this.clone()),
            });
        }

        Ok(match shape {
            CallShape::Explicit { this_arg } => ReceiverBinding {
                rule: BindingRule::Explicit,
                receiver: Receiver::Value(this_arg.clone()),
            },
            CallShape::Method { base } => ReceiverBinding {
                rule: BindingRule::Implicit,
                receiver: Receiver::Value(base.clone()),
            },
            CallShape::Bare | CallShape::Construct => ReceiverBinding {
                rule: BindingRule::Default,
                receiver: Receiver::Absent,
            },
        })
    }

    /// The object a constructed instance links to: `f.prototype` when that
    /// is an object, `Object.prototype` otherwise
    fn designated_prototype(&self, func: ObjectId) -> Result<ObjectId, ModelError> {
        let key = PropertyKey::from("prototype");
        Ok(match self.graph.find_property(func, &key)? {
            Some((
                _,
                PropertyDescriptor::Data {
                    value: Value::Object(proto),
                    ..
                },
            )) => *proto,
            _ => self.object_prototype(),
        })
    }
}
