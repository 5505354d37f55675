//! Defaults Store
//!
//! Immutable snapshot of the factory defaults, checked once against the
//! schema so every declared leaf has a value of the declared kind.

use crate::error::SettingsError;
use crate::schema::{path, Schema};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Factory defaults covering every schema leaf
#[derive(Debug, Clone)]
pub struct DefaultsStore {
    schema: Arc<Schema>,
    document: Value,
}

impl DefaultsStore {
    /// Load a raw defaults document.
    ///
    /// Fails with `SchemaMismatch` when a leaf has no value, a key is not
    /// declared, or a value disagrees with its declared kind.
    pub fn load(schema: Arc<Schema>, raw: Value) -> Result<Self, SettingsError> {
        schema.validate_complete(&raw)?;
        debug!(leaves = schema.leaf_paths().len(), "Defaults store loaded");
        Ok(Self {
            schema,
            document: raw,
        })
    }

    /// Defaults declared by the schema itself
    pub fn factory(schema: Arc<Schema>) -> Result<Self, SettingsError> {
        let raw = schema.default_document();
        Self::load(schema, raw)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Default value at a schema path.
    ///
    /// Paths below a mapping resolve only for keys present in the defaults.
    /// Field paths below a record list describe the element shape, not a
    /// stored value, and fail with `UnknownPath`.
    pub fn get(&self, at: &str) -> Result<&Value, SettingsError> {
        self.schema.describe(at)?;
        let mut current = &self.document;
        for segment in path::segments(at)? {
            current = current
                .get(segment)
                .ok_or_else(|| SettingsError::UnknownPath {
                    path: at.to_string(),
                })?;
        }
        Ok(current)
    }
}
