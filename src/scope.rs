//! Lexical scopes and identifier resolution
//!
//! Resolving an identifier that no enclosing scope declares fails with
//! `UnresolvedReference`. Reading a missing *property* is `undefined`
//! instead; the two paths are deliberately separate.

use crate::error::ModelError;
use crate::prelude::FxHashMap;
use crate::realm::{Realm, WritePolicy};
use crate::value::{JsString, Value};

/// Handle to a scope in a realm's scope arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// A variable binding
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

#[derive(Debug, Default)]
struct Scope {
    bindings: FxHashMap<JsString, Binding>,
    outer: Option<ScopeId>,
}

/// Arena of scopes. Slot 0 is the global scope.
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)
    }

    /// The innermost scope on `start`'s chain that binds `name`
    fn find(&self, start: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(start);
        while let Some(id) = current {
            let scope = self.get(id)?;
            if scope.bindings.contains_key(name) {
                return Some(id);
            }
            current = scope.outer;
        }
        None
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Realm {
    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a scope nested in `outer`
    pub fn create_scope(&mut self, outer: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.scopes.len() as u32);
        self.scopes.scopes.push(Scope {
            bindings: FxHashMap::default(),
            outer: Some(outer),
        });
        id
    }

    /// Declare a mutable binding (`let`/`var`) in `scope`
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: impl Into<Value>) {
        self.declare_binding(scope, name, value.into(), true);
    }

    /// Declare an immutable binding (`const`) in `scope`
    pub fn declare_const(&mut self, scope: ScopeId, name: &str, value: impl Into<Value>) {
        self.declare_binding(scope, name, value.into(), false);
    }

    fn declare_binding(&mut self, scope: ScopeId, name: &str, value: Value, mutable: bool) {
        if let Some(scope) = self.scopes.get_mut(scope) {
            scope
                .bindings
                .insert(JsString::from(name), Binding { value, mutable });
        }
    }

    /// Resolve an identifier, walking outwards from `scope`
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<Value, ModelError> {
        self.scopes
            .find(scope, name)
            .and_then(|id| self.scopes.get(id))
            .and_then(|scope| scope.bindings.get(name))
            .map(|binding| binding.value.clone())
            .ok_or_else(|| ModelError::reference_error(name))
    }

    /// Assign to an identifier. An undeclared name becomes a global binding
    /// under the silent write policy and an `UnresolvedReference` under the
    /// strict one.
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        let value = value.into();
        let Some(target) = self.scopes.find(scope, name) else {
            let policy = self.config().write_policy;
            return match policy {
                WritePolicy::Strict => Err(ModelError::reference_error(name)),
                WritePolicy::Silent => {
                    tracing::trace!(name, "implicit global binding");
                    let global = self.global_scope();
                    self.declare(global, name, value);
                    Ok(())
                }
            };
        };

        let binding = self
            .scopes
            .get_mut(target)
            .and_then(|scope| scope.bindings.get_mut(name))
            .ok_or_else(|| ModelError::reference_error(name))?;
        if !binding.mutable {
            return Err(ModelError::type_error(format!(
                "Assignment to constant variable '{}'",
                name
            )));
        }
        binding.value = value;
        Ok(())
    }
}
