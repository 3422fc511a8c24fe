//! # Schema
//!
//! A [`Schema`] compiles nested definitions into a flat map from dotted
//! path to [`Property`], while keeping the tree order needed for
//! traversal (top-level names in declaration order, each container
//! listing its children).
//!
//! ## Registration
//!
//! [`Schema::path`] compiles the whole definition subtree before touching
//! the schema, so a malformed definition leaves the schema unchanged.
//! Registering a path that already exists replaces it, along with every
//! registered descendant of the old node. Missing ancestors are created
//! as empty containers; an ancestor that is currently a leaf is replaced
//! by a container.
//!
//! ## Thread Safety
//!
//! `Schema` is `Send + Sync`. Validation takes `&self`, so one schema can
//! serve concurrent passes over different objects.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::Value;
use shapeguard_core::{FieldPath, ValueKind};
use tracing::debug;

use crate::definition::{Definition, DefinitionNode, Rule};
use crate::error::{SchemaError, ValidationFailed};
use crate::property::Property;
use crate::validate::{self, ValidateOptions, Violations};

/// A compiled object schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Every registered node, keyed by dotted path.
    props: HashMap<String, Property>,
    /// Top-level names in registration order.
    roots: Vec<String>,
}

impl Schema {
    /// An empty schema. With no properties, a stripping pass removes every key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a schema, registering each top-level field of `definition`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found in the definition tree.
    pub fn from_definition(definition: Definition) -> Result<Self, SchemaError> {
        let mut schema = Schema::new();
        for (name, node) in definition.entries() {
            let path = FieldPath::parse(name.as_str())?;
            let child = match node {
                DefinitionNode::Nested(child) => child,
                _ => return Err(SchemaError::NotADefinition { path }),
            };
            schema.register(path, child)?;
        }
        Ok(schema)
    }

    /// Compile a schema from a JSON literal definition.
    ///
    /// Top-level keys are always field names, so a field may be called
    /// `type` or `required` here.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] for a non-object literal, or the
    /// first error found while compiling its fields.
    pub fn from_json(definition: &Value) -> Result<Self, SchemaError> {
        let fields = definition.as_object().ok_or_else(|| SchemaError::NotAnObject {
            found: ValueKind::of(definition).to_string(),
        })?;
        let mut schema = Schema::new();
        for (name, child) in fields {
            let path = FieldPath::parse(name.as_str())?;
            if !child.is_object() {
                return Err(SchemaError::NotADefinition { path });
            }
            schema.register(path, &Definition::from_json(child)?)?;
        }
        Ok(schema)
    }

    /// Register `definition` at the dotted `path` and return the created
    /// property.
    ///
    /// A definition made of field names recurses, producing a container
    /// at `path` with one child per field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPath`] for a malformed path, or any
    /// classification error from the definition subtree. On error the
    /// schema is left unchanged.
    pub fn path(&mut self, path: &str, definition: Definition) -> Result<&Property, SchemaError> {
        let path = FieldPath::parse(path)?;
        self.register(path, &definition)
    }

    /// Same as [`Schema::path`] with a JSON literal definition.
    ///
    /// # Errors
    ///
    /// See [`Schema::path`] and [`Definition::from_json`].
    pub fn path_json(&mut self, path: &str, definition: &Value) -> Result<&Property, SchemaError> {
        self.path(path, Definition::from_json(definition)?)
    }

    fn register(
        &mut self,
        path: FieldPath,
        definition: &Definition,
    ) -> Result<&Property, SchemaError> {
        let mut compiled = Vec::new();
        compile(&path, definition, &mut compiled)?;

        for ancestor in path.ancestors() {
            self.establish_container(&ancestor);
        }
        let replaced = self.remove_subtree(&path);
        if replaced > 0 {
            debug!(path = %path, replaced, "replacing registered property");
        }
        self.link(&path);

        let mut compiled = compiled.into_iter();
        let top = compiled.next();
        for property in compiled {
            self.props.insert(property.path().to_string(), property);
        }
        debug!(
            path = %path,
            properties = self.props.len(),
            "registered schema path"
        );

        // `compile` always yields the node at `path` first.
        let top = top.unwrap_or_else(|| Property::leaf(path.clone(), Default::default()));
        let property = match self.props.entry(path.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(top);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(top),
        };
        Ok(property)
    }

    /// Make sure `path` is a container, creating or replacing as needed.
    fn establish_container(&mut self, path: &FieldPath) {
        match self.props.get(path.as_str()) {
            Some(existing) if existing.is_container() => return,
            Some(_) => debug!(path = %path, "replacing leaf with container"),
            None => {}
        }
        self.props.insert(
            path.to_string(),
            Property::container(path.clone(), Vec::new()),
        );
        self.link(path);
    }

    /// Record `path` under its parent (or as a root) if not already there.
    fn link(&mut self, path: &FieldPath) {
        match path.parent() {
            Some(parent) => {
                if let Some(parent) = self.props.get_mut(parent.as_str()) {
                    parent.add_child(path.name());
                }
            }
            None => {
                if !self.roots.iter().any(|r| r == path.name()) {
                    self.roots.push(path.name().to_string());
                }
            }
        }
    }

    /// Drop the node at `path` and all its descendants. Returns how many
    /// properties were removed. The parent's child list is left alone so
    /// a re-registration keeps its position.
    fn remove_subtree(&mut self, path: &FieldPath) -> usize {
        let before = self.props.len();
        self.props.retain(|key, property| {
            key != path.as_str() && !path.is_ancestor_of(property.path())
        });
        before - self.props.len()
    }

    /// Read-only view of every registered property, keyed by dotted path.
    pub fn props(&self) -> &HashMap<String, Property> {
        &self.props
    }

    /// Look up a property by dotted path.
    pub fn get(&self, path: &str) -> Option<&Property> {
        self.props.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.props.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Top-level names in declaration order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Direct children of the container at `path`, in declaration order.
    pub fn children(&self, path: &str) -> Vec<&Property> {
        let Some(parent) = self.props.get(path) else {
            return Vec::new();
        };
        parent
            .children()
            .iter()
            .filter_map(|name| self.props.get(&format!("{path}.{name}")))
            .collect()
    }

    /// Every property in traversal order: roots in declaration order,
    /// depth-first into containers.
    pub fn walk(&self) -> Vec<&Property> {
        let mut out = Vec::with_capacity(self.props.len());
        let mut stack: Vec<&Property> = self
            .roots
            .iter()
            .rev()
            .filter_map(|name| self.props.get(name))
            .collect();
        while let Some(property) = stack.pop() {
            out.push(property);
            let base = property.path();
            stack.extend(
                property
                    .children()
                    .iter()
                    .rev()
                    .filter_map(|name| self.props.get(&format!("{base}.{name}"))),
            );
        }
        out
    }

    /// Leaf properties in traversal order.
    pub fn leaves(&self) -> Vec<&Property> {
        self.walk().into_iter().filter(|p| p.is_leaf()).collect()
    }

    /// Dotted paths of every leaf in traversal order.
    pub fn leaf_paths(&self) -> Vec<&str> {
        self.leaves().into_iter().map(|p| p.path().as_str()).collect()
    }

    /// Validate `object` with default options (strip on, typecast off).
    ///
    /// Mutates `object` in place: unregistered keys are removed.
    pub fn validate(&self, object: &mut Value) -> Violations {
        self.validate_with(object, &ValidateOptions::default())
    }

    /// Validate `object` with explicit options. Returns every violation;
    /// an empty result means the object is valid.
    pub fn validate_with(&self, object: &mut Value, options: &ValidateOptions) -> Violations {
        validate::run(self, object, options)
    }

    /// Validate with default options and fail if anything was found.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailed`] carrying all violations.
    pub fn assert(&self, object: &mut Value) -> Result<(), ValidationFailed> {
        self.assert_with(object, &ValidateOptions::default())
    }

    /// Validate with explicit options and fail if anything was found.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailed`] carrying all violations.
    pub fn assert_with(
        &self,
        object: &mut Value,
        options: &ValidateOptions,
    ) -> Result<(), ValidationFailed> {
        let violations = self.validate_with(object, options);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailed::new(violations))
        }
    }
}

impl TryFrom<Definition> for Schema {
    type Error = SchemaError;

    fn try_from(definition: Definition) -> Result<Self, Self::Error> {
        Schema::from_definition(definition)
    }
}

/// Compile `definition` at `path` into properties, the node at `path`
/// first, then its descendants depth-first.
fn compile(
    path: &FieldPath,
    definition: &Definition,
    out: &mut Vec<Property>,
) -> Result<(), SchemaError> {
    match definition.classify(path)? {
        Rule::Leaf(rule) => out.push(Property::leaf(path.clone(), rule)),
        Rule::Container(fields) => {
            let names = fields.iter().map(|(name, _)| name.to_string()).collect();
            out.push(Property::container(path.clone(), names));
            for (name, child) in fields {
                compile(&path.child(name)?, child, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn string() -> Definition {
        Definition::typed(ValueKind::String)
    }

    #[test]
    fn test_path_registers_leaf() {
        let mut schema = Schema::new();
        let prop = schema.path("name", string()).unwrap();
        assert_eq!(prop.name(), "name");
        assert!(prop.is_leaf());
        assert!(schema.contains("name"));
        assert_eq!(schema.roots(), ["name".to_string()]);
    }

    #[test]
    fn test_nested_definition_registers_container_and_leaves() {
        let mut schema = Schema::new();
        let prop = schema
            .path("name", Definition::new().field("first", string()).field("last", string()))
            .unwrap();
        assert!(prop.is_container());
        assert_eq!(prop.children(), ["first".to_string(), "last".to_string()]);
        assert!(schema.get("name.first").unwrap().is_leaf());
        assert_eq!(schema.leaf_paths(), vec!["name.first", "name.last"]);
    }

    #[test]
    fn test_dotted_path_creates_ancestors() {
        let mut schema = Schema::new();
        let prop = schema.path("a.b.c", string()).unwrap();
        assert_eq!(prop.name(), "c");
        assert!(schema.get("a").unwrap().is_container());
        assert_eq!(schema.get("a.b").unwrap().children(), ["c".to_string()]);
        assert_eq!(schema.leaf_paths(), vec!["a.b.c"]);
    }

    #[test]
    fn test_dotted_path_extends_existing_container() {
        let mut schema = Schema::new();
        schema.path("name", Definition::new().field("first", string())).unwrap();
        schema.path("name.last", string()).unwrap();
        assert_eq!(schema.leaf_paths(), vec!["name.first", "name.last"]);
    }

    #[test]
    fn test_reregistration_replaces_and_drops_descendants() {
        let mut schema = Schema::new();
        schema.path("name", Definition::new().field("first", string())).unwrap();
        schema.path("age", Definition::typed(ValueKind::Number)).unwrap();
        schema.path("name", string()).unwrap();

        assert!(schema.get("name").unwrap().is_leaf());
        assert!(!schema.contains("name.first"));
        // Position among roots is kept.
        assert_eq!(schema.leaf_paths(), vec!["name", "age"]);
    }

    #[test]
    fn test_leaf_ancestor_becomes_container() {
        let mut schema = Schema::new();
        schema.path("name", string()).unwrap();
        schema.path("name.first", string()).unwrap();
        assert!(schema.get("name").unwrap().is_container());
        assert_eq!(schema.leaf_paths(), vec!["name.first"]);
    }

    #[test]
    fn test_failed_registration_leaves_schema_unchanged() {
        let mut schema = Schema::new();
        schema.path("name", string()).unwrap();
        let bad = Definition::new()
            .field("ok", string())
            .field("bad", Definition::typed(ValueKind::String).field("x", string()));
        assert!(schema.path("name", bad).is_err());
        assert!(schema.get("name").unwrap().is_leaf());
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_invalid_path_rejected() {
        let mut schema = Schema::new();
        let err = schema.path("a..b", string()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPath(_)));
    }

    #[test]
    fn test_from_json_declaration_order() {
        let schema = Schema::from_json(&json!({
            "zeta": {"type": "string"},
            "alpha": {"inner": {"type": "number"}, "other": {}},
        }))
        .unwrap();
        assert_eq!(schema.leaf_paths(), vec!["zeta", "alpha.inner", "alpha.other"]);
    }

    #[test]
    fn test_from_json_top_level_keys_are_fields() {
        let schema = Schema::from_json(&json!({"type": {"type": "string"}})).unwrap();
        assert!(schema.get("type").unwrap().is_leaf());

        let err = Schema::from_json(&json!({"name": "string"})).unwrap_err();
        assert!(matches!(err, SchemaError::NotADefinition { .. }));
        assert!(matches!(
            Schema::from_json(&json!("nope")).unwrap_err(),
            SchemaError::NotAnObject { .. }
        ));
    }

    #[test]
    fn test_from_definition_rejects_rule_at_root() {
        let err = Schema::from_definition(string()).unwrap_err();
        assert!(matches!(err, SchemaError::NotADefinition { .. }));
    }

    #[test]
    fn test_children_lookup() {
        let schema = Schema::from_json(&json!({"name": {"first": {}, "last": {}}})).unwrap();
        let names: Vec<&str> = schema.children("name").iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["first", "last"]);
        assert!(schema.children("missing").is_empty());
    }

    #[test]
    fn test_every_registered_path_is_reachable() {
        let mut schema = Schema::new();
        schema.path("a.b", string()).unwrap();
        schema.path("a", Definition::new().field("c", string())).unwrap();
        schema.path("d.e.f", string()).unwrap();
        assert_eq!(schema.walk().len(), schema.len());
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
