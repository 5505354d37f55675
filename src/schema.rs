//! Schema Registry
//!
//! Declares the typed shape of every configuration group: names, value kinds,
//! defaults and nesting. A schema is pure data; it is built once at startup,
//! checked for internal consistency, and shared read-only afterwards.

pub mod blender;
mod node;
pub mod path;
pub(crate) mod validate;

pub use node::{value_shape, Kind, SchemaNode};
pub use validate::Coverage;

use crate::error::SettingsError;
use serde_json::Value;
use std::collections::HashSet;
use validate::check;

/// Typed description of all configuration paths
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: SchemaNode,
}

impl Schema {
    /// Build a schema from its top-level nodes.
    ///
    /// Fails with `SchemaMismatch` when a node is malformed or a declared
    /// default does not match its own kind.
    pub fn new(children: Vec<SchemaNode>) -> Result<Self, SettingsError> {
        let root = SchemaNode::group("", children);
        check_node(&root, "")?;
        check(&root, &root.default_value, "", Coverage::Complete)
            .map_err(|v| v.into_defaults_error())?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Describe the node at a dotted path. The empty path is the root.
    ///
    /// Segments below a typed mapping name an arbitrary entry key and
    /// continue into the entry template.
    pub fn describe(&self, path: &str) -> Result<&SchemaNode, SettingsError> {
        let mut node = &self.root;
        for segment in path::segments(path)? {
            let next = match node.kind {
                Kind::Group | Kind::RecordList => node.child(segment),
                Kind::Mapping => node.entry.as_deref(),
                _ => None,
            };
            node = next.ok_or_else(|| SettingsError::UnknownPath {
                path: path.to_string(),
            })?;
        }
        Ok(node)
    }

    /// Declared children of the node at `path`. Open mappings have none.
    pub fn children_of(&self, path: &str) -> Result<&[SchemaNode], SettingsError> {
        Ok(&self.describe(path)?.children)
    }

    pub fn kind_of(&self, path: &str) -> Result<&Kind, SettingsError> {
        Ok(&self.describe(path)?.kind)
    }

    /// Every leaf path in declaration order.
    ///
    /// Lists and mappings count as leaves; their contents are values.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaves(&self.root, "", &mut out);
        out
    }

    /// The schema's own factory document
    pub fn default_document(&self) -> Value {
        self.root.default_value.clone()
    }

    /// Validate a sparse override document.
    ///
    /// Unknown keys fail with `UnknownPath`, wrong kinds with `TypeMismatch`.
    pub fn validate_override(&self, document: &Value) -> Result<(), SettingsError> {
        check(&self.root, document, "", Coverage::Partial).map_err(|v| v.into_layer_error())
    }

    /// Validate a complete document, as required of defaults.
    pub fn validate_complete(&self, document: &Value) -> Result<(), SettingsError> {
        check(&self.root, document, "", Coverage::Complete).map_err(|v| v.into_defaults_error())
    }
}

fn collect_leaves(node: &SchemaNode, at: &str, out: &mut Vec<String>) {
    for child in &node.children {
        let child_path = path::join(at, &child.name);
        if child.is_leaf() {
            out.push(child_path);
        } else {
            collect_leaves(child, &child_path, out);
        }
    }
}

fn malformed(at: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::SchemaMismatch {
        path: at.to_string(),
        reason: reason.into(),
    }
}

/// Structural invariants of a node tree
fn check_node(node: &SchemaNode, at: &str) -> Result<(), SettingsError> {
    match &node.kind {
        Kind::ScalarList(element) if !element.is_scalar() => {
            return Err(malformed(at, format!("list element kind {} is not scalar", element)));
        }
        Kind::Mapping if !node.children.is_empty() => {
            return Err(malformed(at, "mapping cannot declare fixed children"));
        }
        Kind::RecordList if node.children.is_empty() => {
            return Err(malformed(at, "record list declares no fields"));
        }
        Kind::Enum(variants) if variants.is_empty() => {
            return Err(malformed(at, "enum declares no variants"));
        }
        _ => {}
    }
    if node.entry.is_some() && node.kind != Kind::Mapping {
        return Err(malformed(at, "only mappings carry an entry template"));
    }
    if !node.children.is_empty() && !matches!(node.kind, Kind::Group | Kind::RecordList) {
        return Err(malformed(at, format!("{} cannot declare children", node.kind)));
    }

    let mut seen = HashSet::new();
    for child in &node.children {
        let child_path = path::join(at, &child.name);
        if child.name.is_empty() || child.name.contains(['.', '[', ']']) {
            return Err(malformed(&child_path, "invalid key name"));
        }
        if !seen.insert(child.name.as_str()) {
            return Err(malformed(&child_path, "duplicate key"));
        }
        check_node(child, &child_path)?;
    }

    if let Some(entry) = &node.entry {
        let entry_path = path::join(at, "*");
        check_node(entry, &entry_path)?;
        check(entry, &entry.default_value, &entry_path, Coverage::Complete)
            .map_err(|v| v.into_defaults_error())?;
    }
    Ok(())
}
