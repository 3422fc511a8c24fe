//! # shapeguard-schema — Object Schema Validation
//!
//! Validates JSON objects (flat or arbitrarily nested) against a
//! declarative shape, optionally casting values to their declared types
//! and stripping unknown keys, and reports every violation found.
//!
//! ## Pipeline
//!
//! ```text
//! Definition ──classify──▶ Schema (dotted path → Property)
//!                               │
//!              validate(&mut object, options)
//!                               ▼
//!                  Violations  (assert: ValidationFailed)
//! ```
//!
//! - [`definition`]: the declarative grammar. A node whose keys are rule
//!   keywords (`type`, `required`, `validate`, `cast`, `message`) is a
//!   leaf; a node whose keys are field names is a container.
//! - [`schema`]: compilation into a flat, addressable property map and
//!   the `validate` / `assert` entry points.
//! - [`validate`]: the single traversal shared by both entry points:
//!   typecast, check, then strip.
//! - [`capability`]: closures for custom validators and casts.
//! - [`cast`]: built-in coercions toward the JSON kinds.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use shapeguard_schema::{Schema, ValidateOptions};
//!
//! let schema = Schema::from_json(&json!({
//!     "name": { "first": { "type": "string", "required": true } },
//!     "age": { "type": "number" },
//! }))
//! .unwrap();
//!
//! let mut person = json!({ "name": { "first": "Ada" }, "age": "36", "extra": 1 });
//! let violations = schema.validate_with(&mut person, &ValidateOptions::default().with_typecast(true));
//! assert!(violations.is_empty());
//! assert_eq!(person, json!({ "name": { "first": "Ada" }, "age": 36 }));
//! ```
//!
//! ## Crate Policy
//!
//! - Malformed definitions fail at registration, never at validation.
//! - `validate` never fails for data problems; only `assert` raises.
//! - The input object is mutated in place by casting and stripping.

pub mod capability;
pub mod cast;
pub mod definition;
pub mod error;
pub mod property;
pub mod schema;
pub mod types;
pub mod validate;

pub use capability::{CastError, Caster, Check, Validator};
pub use definition::{Definition, DefinitionNode, LeafRule, Rule, RESERVED_KEYWORDS};
pub use error::{SchemaError, ValidationFailed};
pub use property::{Property, PropertyKind};
pub use schema::Schema;
pub use shapeguard_core::{FieldPath, ValueKind};
pub use types::TypeTag;
pub use validate::{ValidateOptions, Violation, ViolationKind, Violations};
