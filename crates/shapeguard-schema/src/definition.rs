//! # Definition Grammar
//!
//! A [`Definition`] is the declarative description of one node of a
//! schema. Its keys are either *rule keywords* ([`RESERVED_KEYWORDS`]),
//! which make the node a leaf carrying validation rules, or plain *field
//! names*, which make it a container of nested definitions.
//!
//! Classification happens once, in [`Definition::classify`], and yields
//! an explicit [`Rule`]: either a [`LeafRule`] or a list of child
//! definitions. Nothing downstream re-inspects keys.
//!
//! ```text
//! { name: { first: { type: "string", required: true } } }
//!   ^container ^container ^leaf
//! ```
//!
//! An empty definition is an untyped optional leaf: it accepts any value
//! and keeps its key when stripping.

use serde_json::Value;
use shapeguard_core::{FieldPath, ValueKind, path::SEPARATOR};

use crate::capability::{Caster, Check, Validator};
use crate::error::SchemaError;
use crate::types::TypeTag;

/// Keys that mark a definition node as a leaf.
pub const RESERVED_KEYWORDS: [&str; 5] = ["type", "required", "validate", "cast", "message"];

/// True if `key` is a rule keyword.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYWORDS.contains(&key)
}

/// The value stored under one key of a [`Definition`].
#[derive(Debug, Clone)]
pub enum DefinitionNode {
    Type(TypeTag),
    Required(bool),
    Validate(Validator),
    Cast(Caster),
    Message(String),
    /// A nested definition (a field of a container).
    Nested(Definition),
    /// A raw JSON value from a literal definition, interpreted at
    /// classification time.
    Literal(Value),
}

/// An ordered declarative definition node.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    entries: Vec<(String, DefinitionNode)>,
}

/// Classified form of a definition node.
#[derive(Debug, Clone)]
pub enum Rule<'a> {
    Leaf(LeafRule),
    /// Child field names with their definitions, in declaration order.
    Container(Vec<(&'a str, &'a Definition)>),
}

/// The validation rules of a leaf.
#[derive(Debug, Clone, Default)]
pub struct LeafRule {
    pub type_tag: Option<TypeTag>,
    pub required: bool,
    pub validate: Option<Validator>,
    pub cast: Option<Caster>,
    /// Replaces the generated message for any failure of this leaf.
    pub message: Option<String>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Definition::new().of_type(tag)`.
    pub fn typed(tag: impl Into<TypeTag>) -> Self {
        Self::new().of_type(tag)
    }

    pub fn of_type(self, tag: impl Into<TypeTag>) -> Self {
        self.set("type", DefinitionNode::Type(tag.into()))
    }

    pub fn required(self, required: bool) -> Self {
        self.set("required", DefinitionNode::Required(required))
    }

    pub fn validate<F, R>(self, f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Check>,
    {
        self.validator(Validator::new(f))
    }

    pub fn validator(self, validator: Validator) -> Self {
        self.set("validate", DefinitionNode::Validate(validator))
    }

    pub fn cast<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, crate::capability::CastError> + Send + Sync + 'static,
    {
        self.caster(Caster::new(f))
    }

    pub fn caster(self, caster: Caster) -> Self {
        self.set("cast", DefinitionNode::Cast(caster))
    }

    pub fn message(self, message: impl Into<String>) -> Self {
        self.set("message", DefinitionNode::Message(message.into()))
    }

    /// Add a nested field, making this node a container.
    pub fn field(self, name: impl Into<String>, definition: Definition) -> Self {
        self.set(name, DefinitionNode::Nested(definition))
    }

    /// Builder form of [`Definition::insert`].
    pub fn set(mut self, key: impl Into<String>, node: DefinitionNode) -> Self {
        self.insert(key, node);
        self
    }

    /// Set `key`, replacing an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, node: DefinitionNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((key, node)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DefinitionNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, node)| node)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> &[(String, DefinitionNode)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a definition from a JSON literal such as
    /// `{"name": {"first": {"type": "string", "required": true}}}`.
    ///
    /// Rule keyword values are kept raw and checked by
    /// [`Definition::classify`], so errors carry the offending path.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] if `value` is not an object.
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let map = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
            found: ValueKind::of(value).to_string(),
        })?;
        let mut definition = Definition::new();
        for (key, child) in map {
            let node = if !is_reserved(key) && child.is_object() {
                DefinitionNode::Nested(Definition::from_json(child)?)
            } else {
                DefinitionNode::Literal(child.clone())
            };
            definition.insert(key.clone(), node);
        }
        Ok(definition)
    }

    /// Classify this node as leaf or container.
    ///
    /// # Errors
    ///
    /// Fails when keywords and field names are mixed, when a keyword
    /// carries the wrong kind of value, or when a field is not itself a
    /// definition.
    pub fn classify(&self, path: &FieldPath) -> Result<Rule<'_>, SchemaError> {
        let (keywords, fields): (Vec<_>, Vec<_>) =
            self.entries.iter().partition(|(key, _)| is_reserved(key));

        if !keywords.is_empty() && !fields.is_empty() {
            return Err(SchemaError::MixedDefinition {
                path: path.clone(),
                keywords: keywords.iter().map(|(k, _)| k.clone()).collect(),
                fields: fields.iter().map(|(k, _)| k.clone()).collect(),
            });
        }

        if fields.is_empty() {
            return self.leaf_rule(path).map(Rule::Leaf);
        }

        fields
            .into_iter()
            .map(|(name, node)| {
                if name.contains(SEPARATOR) {
                    return Err(SchemaError::InvalidFieldName {
                        parent: path.clone(),
                        name: name.clone(),
                    });
                }
                let child_path = path.child(name)?;
                match node {
                    DefinitionNode::Nested(definition) => Ok((name.as_str(), definition)),
                    _ => Err(SchemaError::NotADefinition { path: child_path }),
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Rule::Container)
    }

    fn leaf_rule(&self, path: &FieldPath) -> Result<LeafRule, SchemaError> {
        let mut rule = LeafRule::default();
        for (keyword, node) in &self.entries {
            let invalid = |expected| SchemaError::InvalidRuleValue {
                path: path.clone(),
                keyword: keyword.clone(),
                expected,
            };
            match (keyword.as_str(), node) {
                ("type", DefinitionNode::Type(TypeTag::Kind(ValueKind::Null))) => {
                    return Err(unknown_type(path, ValueKind::Null.as_str()));
                }
                ("type", DefinitionNode::Type(tag)) => rule.type_tag = Some(tag.clone()),
                ("type", DefinitionNode::Literal(Value::String(name))) => {
                    let kind = name
                        .parse::<ValueKind>()
                        .ok()
                        .filter(|kind| *kind != ValueKind::Null)
                        .ok_or_else(|| unknown_type(path, name))?;
                    rule.type_tag = Some(TypeTag::Kind(kind));
                }
                ("type", _) => return Err(invalid("a type name")),
                ("required", DefinitionNode::Required(required))
                | ("required", DefinitionNode::Literal(Value::Bool(required))) => {
                    rule.required = *required;
                }
                ("required", _) => return Err(invalid("a boolean")),
                ("message", DefinitionNode::Message(message))
                | ("message", DefinitionNode::Literal(Value::String(message))) => {
                    rule.message = Some(message.clone());
                }
                ("message", _) => return Err(invalid("a string")),
                ("validate", DefinitionNode::Validate(validator)) => {
                    rule.validate = Some(validator.clone());
                }
                ("cast", DefinitionNode::Cast(caster)) => rule.cast = Some(caster.clone()),
                ("validate" | "cast", DefinitionNode::Literal(_)) => {
                    return Err(SchemaError::CapabilityInLiteral {
                        path: path.clone(),
                        keyword: keyword.clone(),
                    });
                }
                ("validate", _) => return Err(invalid("a validator function")),
                _ => return Err(invalid("a cast function")),
            }
        }
        Ok(rule)
    }
}

/// `null` is a value kind but never a declarable type: a null value
/// counts as absent, so a leaf typed `null` could never pass.
fn unknown_type(path: &FieldPath, type_name: &str) -> SchemaError {
    SchemaError::UnknownType {
        path: path.clone(),
        type_name: type_name.to_string(),
    }
}
