//! Error types for the object model

use thiserror::Error;

use crate::object::ObjectId;

/// Main error type for the object model
///
/// Writes that the model rejects silently (non-writable targets, missing
/// setters, non-extensible objects) are not errors and never show up here.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A descriptor update violates configurability or writability, or a
    /// descriptor patch mixes data and accessor fields.
    #[error("TypeConflict: cannot redefine property '{key}': {message}")]
    TypeConflict { key: String, message: String },

    /// Identifier resolution failed in every enclosing scope.
    ///
    /// Property lookup never produces this: a missing property is `undefined`.
    #[error("UnresolvedReference: {name} is not defined")]
    UnresolvedReference { name: String },

    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("TypeError: {what} is not a function")]
    NotCallable { what: String },

    #[error("TypeError: {what} is not a constructor")]
    NotConstructor { what: String },

    #[error("TypeError: {what} is not iterable")]
    NotIterable { what: String },

    /// The handle does not belong to this realm's object graph
    #[error("Internal error: unknown object {0}")]
    UnknownObject(ObjectId),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub fn type_conflict(key: impl ToString, message: impl Into<String>) -> Self {
        ModelError::TypeConflict {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn reference_error(name: impl Into<String>) -> Self {
        ModelError::UnresolvedReference { name: name.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ModelError::TypeError {
            message: message.into(),
        }
    }

    pub fn not_callable(what: impl ToString) -> Self {
        ModelError::NotCallable {
            what: what.to_string(),
        }
    }

    pub fn not_constructor(what: impl ToString) -> Self {
        ModelError::NotConstructor {
            what: what.to_string(),
        }
    }

    pub fn not_iterable(what: impl ToString) -> Self {
        ModelError::NotIterable {
            what: what.to_string(),
        }
    }

    /// Whether this is the error raised for descriptor constraint violations
    pub fn is_type_conflict(&self) -> bool {
        matches!(self, ModelError::TypeConflict { .. })
    }
}
