//! Structural validation of settings documents against schema nodes.

use crate::error::SettingsError;
use crate::schema::node::{value_shape, Kind, SchemaNode};
use crate::schema::path;
use serde_json::{Map, Value};

/// How much of the schema a document must cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Every declared key present (defaults, list records, mapping entries in defaults)
    Complete,
    /// Any subset of declared keys (override layers)
    Partial,
}

/// First structural problem found in a document
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Violation {
    Undeclared {
        path: String,
    },
    Mismatch {
        path: String,
        expected: String,
        found: String,
    },
    Missing {
        path: String,
        expected: String,
    },
}

impl Violation {
    /// Error reported when an override layer is rejected
    pub(crate) fn into_layer_error(self) -> SettingsError {
        match self {
            Violation::Undeclared { path } => SettingsError::UnknownPath { path },
            Violation::Mismatch {
                path,
                expected,
                found,
            } => SettingsError::TypeMismatch {
                path,
                expected,
                found,
            },
            Violation::Missing { path, expected } => SettingsError::TypeMismatch {
                path,
                expected,
                found: "missing".to_string(),
            },
        }
    }

    /// Error reported when a defaults document fails to cover the schema
    pub(crate) fn into_defaults_error(self) -> SettingsError {
        match self {
            Violation::Undeclared { path } => SettingsError::SchemaMismatch {
                path,
                reason: "key is not declared in the schema".to_string(),
            },
            Violation::Mismatch {
                path,
                expected,
                found,
            } => SettingsError::SchemaMismatch {
                path,
                reason: format!("expected {}, found {}", expected, found),
            },
            Violation::Missing { path, expected } => SettingsError::SchemaMismatch {
                path,
                reason: format!("no default value for {} leaf", expected),
            },
        }
    }
}

fn mismatch(node_kind: &Kind, path: &str, value: &Value) -> Violation {
    Violation::Mismatch {
        path: path.to_string(),
        expected: node_kind.to_string(),
        found: value_shape(value),
    }
}

/// Check `value` against `node` located at `at`
pub(crate) fn check(
    node: &SchemaNode,
    value: &Value,
    at: &str,
    coverage: Coverage,
) -> Result<(), Violation> {
    match &node.kind {
        kind if kind.is_scalar() => {
            if kind.accepts_scalar(value) {
                Ok(())
            } else {
                Err(mismatch(kind, at, value))
            }
        }
        Kind::ScalarList(element) => {
            let items = value.as_array().ok_or_else(|| mismatch(&node.kind, at, value))?;
            for (i, item) in items.iter().enumerate() {
                if !element.accepts_scalar(item) {
                    return Err(mismatch(element, &path::index(at, i), item));
                }
            }
            Ok(())
        }
        Kind::RecordList => {
            let items = value.as_array().ok_or_else(|| mismatch(&node.kind, at, value))?;
            for (i, item) in items.iter().enumerate() {
                let item_path = path::index(at, i);
                let record = item.as_object().ok_or_else(|| Violation::Mismatch {
                    path: item_path.clone(),
                    expected: "record".to_string(),
                    found: value_shape(item),
                })?;
                // Lists replace wholesale, so every record stands on its own.
                check_fields(&node.children, record, &item_path, Coverage::Complete)?;
            }
            Ok(())
        }
        Kind::Mapping => {
            let map = value.as_object().ok_or_else(|| mismatch(&node.kind, at, value))?;
            if let Some(entry) = &node.entry {
                for (key, item) in map {
                    check(entry, item, &path::join(at, key), coverage)?;
                }
            }
            Ok(())
        }
        Kind::Group => {
            let map = value.as_object().ok_or_else(|| mismatch(&node.kind, at, value))?;
            check_fields(&node.children, map, at, coverage)
        }
        _ => unreachable!("scalar kinds handled above"),
    }
}

fn check_fields(
    fields: &[SchemaNode],
    map: &Map<String, Value>,
    at: &str,
    coverage: Coverage,
) -> Result<(), Violation> {
    for key in map.keys() {
        if !fields.iter().any(|f| &f.name == key) {
            return Err(Violation::Undeclared {
                path: path::join(at, key),
            });
        }
    }
    for field in fields {
        let field_path = path::join(at, &field.name);
        match map.get(&field.name) {
            Some(item) => check(field, item, &field_path, coverage)?,
            None if coverage == Coverage::Complete => {
                return Err(Violation::Missing {
                    path: field_path,
                    expected: field.kind.to_string(),
                })
            }
            None => {}
        }
    }
    Ok(())
}
