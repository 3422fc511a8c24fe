//! # Validation Engine
//!
//! One pass over an input object against a compiled [`Schema`]:
//!
//! 1. Every leaf path is visited in definition order (top-level keys in
//!    declaration order, depth-first into containers). With `typecast`
//!    on, the value at that path is replaced by the leaf's cast result
//!    first. The leaf's `assert` decides whether a [`Violation`] is
//!    recorded.
//! 2. With `strip` on (the default), every key at every level of the
//!    object that has no registered property is removed. Registered keys
//!    are kept whether or not their values passed.
//!
//! The input is mutated in place when casting or stripping. Callers who
//! need the original must clone it first.
//!
//! Data problems never abort the pass: they are collected and returned.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapeguard_core::{value, FieldPath};
use tracing::{debug, trace};

use crate::property::PropertyKind;
use crate::schema::Schema;

/// Options for a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Remove keys that have no registered property.
    pub strip: bool,
    /// Cast values toward their declared types before checking.
    pub typecast: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strip: true,
            typecast: false,
        }
    }
}

impl ValidateOptions {
    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    pub fn with_typecast(mut self, typecast: bool) -> Self {
        self.typecast = typecast;
        self
    }
}

/// Why a leaf failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required value was absent.
    RequiredMissing,
    /// A present value did not have the declared type.
    TypeMismatch,
    /// A custom validator rejected the value.
    CustomValidationFailed,
}

/// A single failed leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the failing leaf.
    pub path: FieldPath,
    /// What kind of rule failed.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    pub fn new(path: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.path, self.message)
    }
}

/// Ordered collection of violations from one pass. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Just the messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

/// Run one validation pass of `object` against `schema`.
pub fn run(schema: &Schema, object: &mut Value, options: &ValidateOptions) -> Violations {
    let mut violations = Vec::new();

    for property in schema.leaves() {
        let path = property.path();
        if options.typecast {
            if let Some(raw) = value::present(object, path).cloned() {
                let cast = property.cast(raw);
                if let Err(e) = value::replace(object, path, cast) {
                    trace!(error = %e, "typecast result not written back");
                }
            }
        }
        if let Err(violation) = property.assert(value::present(object, path)) {
            violations.push(violation);
        }
    }

    let stripped = if options.strip {
        strip_level(schema, None, schema.roots(), object)
    } else {
        0
    };

    debug!(
        violations = violations.len(),
        stripped,
        typecast = options.typecast,
        "validation pass complete"
    );

    Violations { violations }
}

/// Remove unregistered keys from `target`, whose registered children are
/// `children`, then descend into registered containers.
fn strip_level(
    schema: &Schema,
    parent: Option<&FieldPath>,
    children: &[String],
    target: &mut Value,
) -> usize {
    let Some(map) = target.as_object_mut() else {
        return 0;
    };

    let before = map.len();
    map.retain(|key, _| {
        let keep = children.iter().any(|c| c == key);
        if !keep {
            trace!(parent = ?parent.map(FieldPath::as_str), key = %key, "stripping unregistered key");
        }
        keep
    });
    let mut removed = before - map.len();

    for name in children {
        let Some(child) = map.get_mut(name) else {
            continue;
        };
        let path = match parent {
            Some(parent) => parent.child(name),
            None => FieldPath::parse(name.as_str()),
        };
        let Ok(path) = path else {
            continue;
        };
        if let Some(property) = schema.get(path.as_str()) {
            if let PropertyKind::Container { children } = property.kind() {
                removed += strip_level(schema, Some(&path), children, child);
            }
        }
    }

    removed
}
