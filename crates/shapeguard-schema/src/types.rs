//! # Declared Types
//!
//! A leaf may declare the type its value must have. Built-in tags map
//! onto [`ValueKind`]; [`TypeTag::Custom`] carries a named predicate for
//! domain types ("email", "uuid", ...) that JSON has no kind for.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use shapeguard_core::{with_article, ValueKind};

use crate::cast;
use crate::capability::{CastError, Caster};

type TypePredicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A declared leaf type.
#[derive(Clone)]
pub enum TypeTag {
    /// One of the JSON kinds.
    Kind(ValueKind),
    /// A named predicate, optionally with its own coercion.
    Custom {
        name: String,
        predicate: Arc<TypePredicate>,
        caster: Option<Caster>,
    },
}

impl TypeTag {
    /// A custom type checked by `predicate`.
    pub fn custom<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        TypeTag::Custom {
            name: name.into(),
            predicate: Arc::new(predicate),
            caster: None,
        }
    }

    /// Attach a coercion to a custom type. Built-in kinds keep their
    /// built-in coercion and ignore this.
    pub fn with_caster(self, caster: Caster) -> Self {
        match self {
            TypeTag::Custom { name, predicate, .. } => TypeTag::Custom {
                name,
                predicate,
                caster: Some(caster),
            },
            kind => kind,
        }
    }

    /// The type's name as written in definitions.
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Kind(kind) => kind.as_str(),
            TypeTag::Custom { name, .. } => name,
        }
    }

    /// True if `value` has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeTag::Kind(kind) => ValueKind::of(value) == *kind,
            TypeTag::Custom { predicate, .. } => predicate(value),
        }
    }

    /// Coerce `value` toward this type.
    ///
    /// # Errors
    ///
    /// Returns a [`CastError`] when no coercion exists or it fails.
    pub fn coerce(&self, value: &Value) -> Result<Value, CastError> {
        match self {
            TypeTag::Kind(kind) => cast::to_kind(*kind, value),
            TypeTag::Custom {
                caster: Some(caster),
                ..
            } => caster.cast(value),
            TypeTag::Custom { name, .. } => {
                Err(CastError::new(name.as_str(), value, "no coercion registered"))
            }
        }
    }

    /// `"must be <article> <name>"` fragment used in type mismatch messages.
    pub fn described(&self) -> String {
        with_article(self.name())
    }
}

impl From<ValueKind> for TypeTag {
    fn from(kind: ValueKind) -> Self {
        TypeTag::Kind(kind)
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Kind(kind) => write!(f, "TypeTag::Kind({kind})"),
            TypeTag::Custom { name, .. } => write!(f, "TypeTag::Custom({name})"),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
