//! # Field Paths
//!
//! A [`FieldPath`] is the dotted address of a property from the schema
//! root, e.g. `"name.first"`. Paths are validated on construction, so the
//! rest of the stack never deals with empty segments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Segment separator within a dotted path.
pub const SEPARATOR: char = '.';

/// A validated, non-empty dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] for `""` and
    /// [`PathError::EmptySegment`] for paths like `"a..b"` or `".a"`.
    pub fn parse(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(position) = path.split(SEPARATOR).position(str::is_empty) {
            return Err(PathError::EmptySegment { path, position });
        }
        Ok(Self(path))
    }

    /// The full dotted path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments from the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The last segment, i.e. the property's own key.
    pub fn name(&self) -> &str {
        self.0.rsplit(SEPARATOR).next().unwrap_or(&self.0)
    }

    /// The enclosing path, or `None` for a top-level path.
    pub fn parent(&self) -> Option<FieldPath> {
        self.0
            .rfind(SEPARATOR)
            .map(|idx| FieldPath(self.0[..idx].to_string()))
    }

    /// Every proper ancestor, outermost first.
    pub fn ancestors(&self) -> Vec<FieldPath> {
        self.0
            .match_indices(SEPARATOR)
            .map(|(idx, _)| FieldPath(self.0[..idx].to_string()))
            .collect()
    }

    /// Append one segment.
    ///
    /// # Errors
    ///
    /// Fails if `name` is empty or itself contains an empty segment.
    pub fn child(&self, name: &str) -> Result<FieldPath, PathError> {
        FieldPath::parse(format!("{}{SEPARATOR}{name}", self.0))
    }

    /// True if `other` lies strictly below this path.
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0[self.0.len()..].starts_with(SEPARATOR)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPath::parse(value)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        FieldPath::parse(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
