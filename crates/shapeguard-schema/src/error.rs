//! # Error Types
//!
//! Two distinct failure channels:
//!
//! - [`SchemaError`]: a malformed definition. Raised eagerly by
//!   `Schema::path()` and the schema constructors; never deferred to
//!   validation time.
//! - [`ValidationFailed`]: raised only by `Schema::assert()`, after a full
//!   validation pass, carrying every collected violation.
//!
//! `Schema::validate()` itself never errors for data problems: violations
//! are returned as data.

use shapeguard_core::{FieldPath, PathError};
use thiserror::Error;

use crate::validate::Violations;

/// A malformed schema definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A dotted path could not be parsed.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// A definition node mixed rule keywords with field names.
    #[error("definition at '{path}' mixes rule keywords {keywords:?} with fields {fields:?}")]
    MixedDefinition {
        /// Path of the offending node.
        path: FieldPath,
        /// The reserved keywords found.
        keywords: Vec<String>,
        /// The plain field names found.
        fields: Vec<String>,
    },

    /// A `type` keyword named no known type.
    #[error("unknown type '{type_name}' at '{path}'")]
    UnknownType {
        /// Path of the offending leaf.
        path: FieldPath,
        /// The unrecognised type name.
        type_name: String,
    },

    /// A rule keyword carried a value of the wrong kind.
    #[error("rule '{keyword}' at '{path}' must be {expected}")]
    InvalidRuleValue {
        /// Path of the offending leaf.
        path: FieldPath,
        /// The keyword whose value was wrong.
        keyword: String,
        /// What the keyword accepts.
        expected: &'static str,
    },

    /// A field of a container was not itself a definition.
    #[error("field '{path}' must be a definition object")]
    NotADefinition {
        /// Path of the offending field.
        path: FieldPath,
    },

    /// A `validate` or `cast` keyword appeared in a JSON literal definition.
    #[error("rule '{keyword}' at '{path}' needs a function and cannot be written as a JSON literal")]
    CapabilityInLiteral {
        /// Path of the offending leaf.
        path: FieldPath,
        /// `validate` or `cast`.
        keyword: String,
    },

    /// A field name contained the path separator.
    #[error("field name '{name}' under '{parent}' must not contain '.'")]
    InvalidFieldName {
        /// Path of the enclosing container.
        parent: FieldPath,
        /// The offending field name.
        name: String,
    },

    /// A literal definition root was not a JSON object.
    #[error("definition must be a JSON object, found {found}")]
    NotAnObject {
        /// Kind of the value supplied instead.
        found: String,
    },
}

/// Aggregate failure raised by `Schema::assert()`.
#[derive(Error, Debug, Clone)]
#[error("validation failed with {} violation(s):\n{violations}", .violations.len())]
pub struct ValidationFailed {
    violations: Violations,
}

impl ValidationFailed {
    pub(crate) fn new(violations: Violations) -> Self {
        Self { violations }
    }

    /// Every violation collected by the failing pass.
    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    /// Consume the error and return its violations.
    pub fn into_violations(self) -> Violations {
        self.violations
    }
}
