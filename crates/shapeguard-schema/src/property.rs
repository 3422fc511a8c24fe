//! # Properties
//!
//! A [`Property`] is one addressable node of a compiled schema: a leaf
//! carrying a [`LeafRule`], or a container listing its children by name.
//! Children themselves live in the schema's flat path map; a container
//! only records their names, in declaration order.

use serde_json::Value;
use shapeguard_core::value::{is_absent, presence};
use shapeguard_core::FieldPath;
use tracing::trace;

use crate::capability::Check;
use crate::definition::LeafRule;
use crate::types::TypeTag;
use crate::validate::{Violation, ViolationKind};

/// Leaf rules or container children.
#[derive(Debug, Clone)]
pub enum PropertyKind {
    Leaf(LeafRule),
    Container { children: Vec<String> },
}

/// A compiled schema node.
#[derive(Debug, Clone)]
pub struct Property {
    path: FieldPath,
    kind: PropertyKind,
}

impl Property {
    /// A leaf at `path`.
    pub fn leaf(path: FieldPath, rule: LeafRule) -> Self {
        Self {
            path,
            kind: PropertyKind::Leaf(rule),
        }
    }

    /// A container at `path` with the given child names.
    pub fn container(path: FieldPath, children: Vec<String>) -> Self {
        Self {
            path,
            kind: PropertyKind::Container { children },
        }
    }

    /// The property's own key (last path segment).
    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, PropertyKind::Leaf(_))
    }

    pub fn is_container(&self) -> bool {
        !self.is_leaf()
    }

    /// Leaf rules, or `None` for a container.
    pub fn rule(&self) -> Option<&LeafRule> {
        match &self.kind {
            PropertyKind::Leaf(rule) => Some(rule),
            PropertyKind::Container { .. } => None,
        }
    }

    /// Child names in declaration order. Empty for a leaf.
    pub fn children(&self) -> &[String] {
        match &self.kind {
            PropertyKind::Container { children } => children,
            PropertyKind::Leaf(_) => &[],
        }
    }

    pub fn type_tag(&self) -> Option<&TypeTag> {
        self.rule().and_then(|rule| rule.type_tag.as_ref())
    }

    pub fn is_required(&self) -> bool {
        self.rule().is_some_and(|rule| rule.required)
    }

    pub(crate) fn add_child(&mut self, name: &str) {
        if let PropertyKind::Container { children } = &mut self.kind {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }

    /// Check a candidate value against this leaf's rules.
    ///
    /// `None` and JSON `null` both count as absent. Rules are consulted in
    /// order: presence (if required), then the custom validator if one is
    /// set, otherwise the declared type. An absent optional value always
    /// passes. Containers always pass; their children are checked through
    /// their own paths.
    ///
    /// # Errors
    ///
    /// Returns the [`Violation`] describing the first failed rule.
    pub fn assert(&self, value: Option<&Value>) -> Result<(), Violation> {
        let PropertyKind::Leaf(rule) = &self.kind else {
            return Ok(());
        };

        let Some(value) = presence(value) else {
            if rule.required {
                return Err(self.violation(
                    ViolationKind::RequiredMissing,
                    format!("{} is required", self.path),
                ));
            }
            return Ok(());
        };

        if let Some(validator) = &rule.validate {
            return match validator.check(value) {
                Check::Pass => Ok(()),
                Check::Fail => Err(self.violation(
                    ViolationKind::CustomValidationFailed,
                    format!("{} failed validation", self.path),
                )),
                Check::FailWith(message) => {
                    Err(self.violation(ViolationKind::CustomValidationFailed, message))
                }
            };
        }

        match &rule.type_tag {
            Some(tag) if !tag.matches(value) => Err(self.violation(
                ViolationKind::TypeMismatch,
                format!("{} must be {}", self.path, tag.described()),
            )),
            _ => Ok(()),
        }
    }

    /// Coerce `value` using the explicit `cast` rule, or the declared
    /// type's built-in coercion when there is none.
    ///
    /// Never fails: an absent value, a container, or a failed coercion
    /// hands the input back unchanged and the type check reports it.
    pub fn cast(&self, value: Value) -> Value {
        let PropertyKind::Leaf(rule) = &self.kind else {
            return value;
        };
        if is_absent(Some(&value)) {
            return value;
        }
        let result = match (&rule.cast, &rule.type_tag) {
            (Some(caster), _) => caster.cast(&value),
            (None, Some(tag)) => tag.coerce(&value),
            (None, None) => return value,
        };
        match result {
            Ok(cast) => cast,
            Err(e) => {
                trace!(path = %self.path, error = %e, "typecast failed, keeping original value");
                value
            }
        }
    }

    fn violation(&self, kind: ViolationKind, message: String) -> Violation {
        let message = self
            .rule()
            .and_then(|rule| rule.message.clone())
            .unwrap_or(message);
        Violation::new(self.path.clone(), kind, message)
    }
}
