//! # Path-Addressed Access
//!
//! Helpers for resolving a [`FieldPath`] inside a JSON object tree.
//!
//! A missing key, a missing intermediate object, or an intermediate that
//! is not an object all resolve to "absent", as does JSON `null`. Reads
//! never error on the shape of the input: the shape is what is being
//! validated. Only [`replace`] can fail, when there is no parent object
//! to write into.

use serde_json::Value;

use crate::error::CoreError;
use crate::path::FieldPath;

/// Resolve `path` inside `root`.
pub fn lookup<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// Resolve `path` inside `root` for writing.
pub fn lookup_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    path.segments()
        .try_fold(root, |current, segment| current.as_object_mut()?.get_mut(segment))
}

/// Drop `null`: the value if it counts as present, else `None`.
pub fn presence(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

/// Resolve `path` and treat JSON `null` as absent.
pub fn present<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    presence(lookup(root, path))
}

/// True if the value counts as absent for presence checks.
pub fn is_absent(value: Option<&Value>) -> bool {
    presence(value).is_none()
}

/// Write `value` at `path`, returning the value it displaced.
///
/// The key itself need not exist, but its parent must be an object.
///
/// # Errors
///
/// Returns [`CoreError::MissingParent`] if the parent is missing or is
/// not an object (or, for a top-level path, if `root` is not an object).
pub fn replace(root: &mut Value, path: &FieldPath, value: Value) -> Result<Option<Value>, CoreError> {
    let parent = match path.parent() {
        Some(parent) => lookup_mut(root, &parent),
        None => Some(root),
    };
    let map = parent
        .and_then(Value::as_object_mut)
        .ok_or_else(|| CoreError::MissingParent { path: path.clone() })?;
    Ok(map.insert(path.name().to_string(), value))
}
