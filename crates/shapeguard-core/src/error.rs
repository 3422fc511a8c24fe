//! # Error Types
//!
//! Errors raised by the foundational primitives. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Data problems found while validating an object are never errors at
//! this level: they are collected as violations by `shapeguard-schema`.
//! Only misuse of the primitives themselves (an unparseable dotted path,
//! a write below a non-object) surfaces here.

use thiserror::Error;

use crate::path::FieldPath;

/// Top-level error type for the foundational crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A write addressed a path whose parent is not an object.
    #[error("cannot write '{path}': parent is missing or not an object")]
    MissingParent {
        /// The path that was being written.
        path: FieldPath,
    },

    /// A value kind name was not one of the built-in kinds.
    #[error("unknown value kind '{0}'; expected one of null, boolean, number, string, array, object")]
    UnknownKind(String),
}

/// Error parsing a dotted field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string was empty.
    #[error("path must not be empty")]
    Empty,

    /// The path contained an empty segment (`"a..b"`, `".a"`, `"a."`).
    #[error("path '{path}' has an empty segment at position {position}")]
    EmptySegment {
        /// The offending path string.
        path: String,
        /// Zero-based index of the empty segment.
        position: usize,
    },
}
