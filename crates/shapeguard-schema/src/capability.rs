//! # Pluggable Capabilities
//!
//! Custom validators and typecasters are plain closures behind narrow
//! wrappers. A [`Validator`] answers "is this value acceptable?" and may
//! explain why not; a [`Caster`] coerces a raw value toward a declared
//! type and may fail.
//!
//! Both wrappers are cheap to clone (`Arc`) and `Send + Sync`, so a
//! compiled schema can be shared across threads.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Outcome of a custom validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// The value is acceptable.
    Pass,
    /// The value is rejected without a description.
    Fail,
    /// The value is rejected with a human-readable description.
    FailWith(String),
}

impl Check {
    /// True for [`Check::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Check::Pass)
    }
}

impl From<bool> for Check {
    fn from(ok: bool) -> Self {
        if ok {
            Check::Pass
        } else {
            Check::Fail
        }
    }
}

impl From<Result<(), String>> for Check {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Check::Pass,
            Err(message) => Check::FailWith(message),
        }
    }
}

impl From<Result<(), &str>> for Check {
    fn from(result: Result<(), &str>) -> Self {
        result.map_err(str::to_string).into()
    }
}

type ValidateFn = dyn Fn(&Value) -> Check + Send + Sync;

/// A custom validation predicate attached to a leaf property.
#[derive(Clone)]
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    /// Wrap a closure returning anything convertible into a [`Check`]:
    /// `bool`, `Result<(), String>`, or a `Check` itself.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Check>,
    {
        Self(Arc::new(move |value: &Value| -> Check { f(value).into() }))
    }

    /// Run the predicate.
    pub fn check(&self, value: &Value) -> Check {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// A failed coercion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot cast {found} to {target}: {reason}")]
pub struct CastError {
    /// Name of the type the cast aimed for.
    pub target: String,
    /// Kind of the value that was offered.
    pub found: String,
    /// Why the coercion was impossible.
    pub reason: String,
}

impl CastError {
    /// Build a cast error for `value`.
    pub fn new(target: impl Into<String>, value: &Value, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            found: shapeguard_core::ValueKind::of(value).to_string(),
            reason: reason.into(),
        }
    }
}

type CastFn = dyn Fn(&Value) -> Result<Value, CastError> + Send + Sync;

/// A typecast function attached to a leaf property.
#[derive(Clone)]
pub struct Caster(Arc<CastFn>);

impl Caster {
    /// Wrap a fallible coercion closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CastError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the coercion.
    ///
    /// # Errors
    ///
    /// Propagates the closure's [`CastError`].
    pub fn cast(&self, value: &Value) -> Result<Value, CastError> {
        (self.0)(value)
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Caster(..)")
    }
}
