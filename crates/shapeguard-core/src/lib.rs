//! # shapeguard-core — Foundational Types
//!
//! Primitives shared by the shapeguard validation stack:
//!
//! - [`FieldPath`]: validated dotted paths (`"name.first"`) that address a
//!   property from the schema root.
//! - [`ValueKind`]: runtime kind detection for `serde_json::Value`.
//! - [`value`]: path-addressed lookup and replacement in JSON object
//!   trees, with a single definition of "absent" (missing key, missing
//!   intermediate, non-object intermediate, or `null`).
//! - [`CoreError`]: the error hierarchy for the primitives above.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shapeguard-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod kind;
pub mod path;
pub mod value;

pub use error::{CoreError, PathError};
pub use kind::{with_article, ValueKind};
pub use path::FieldPath;
