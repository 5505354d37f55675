//! Resolved settings tree and its accessors.

use crate::digest::{short_hex, Digest};
use crate::error::SettingsError;
use crate::layers::scope::{ResolutionContext, Scope};
use crate::schema::{path, value_shape, Schema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// A subtree with a fixed location and a typed shape
pub trait Section: DeserializeOwned {
    /// Dotted path of the section in the resolved tree
    const PATH: &'static str;
}

/// Fully-populated settings for one context
#[derive(Debug, Clone)]
pub struct ResolvedTree {
    context: ResolutionContext,
    value: Value,
    layers: Vec<Scope>,
    digest: Digest,
    schema: Arc<Schema>,
}

impl PartialEq for ResolvedTree {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context && self.layers == other.layers && self.value == other.value
    }
}

impl ResolvedTree {
    pub(crate) fn new(
        context: ResolutionContext,
        value: Value,
        layers: Vec<Scope>,
        digest: Digest,
        schema: Arc<Schema>,
    ) -> Self {
        Self {
            context,
            value,
            layers,
            digest,
            schema,
        }
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// Whole tree as a JSON value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Layers merged into this tree, lowest precedence first
    pub fn layers(&self) -> &[Scope] {
        &self.layers
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn digest_hex(&self) -> String {
        short_hex(&self.digest)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Value at a dotted path
    pub fn get(&self, at: &str) -> Result<&Value, SettingsError> {
        let mut current = &self.value;
        for segment in path::segments(at)? {
            current = current
                .get(segment)
                .ok_or_else(|| SettingsError::UnknownPath {
                    path: at.to_string(),
                })?;
        }
        Ok(current)
    }

    fn typed<'a, T>(
        &'a self,
        at: &str,
        expected: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, SettingsError> {
        let value = self.get(at)?;
        extract(value).ok_or_else(|| SettingsError::TypeMismatch {
            path: at.to_string(),
            expected: expected.to_string(),
            found: value_shape(value),
        })
    }

    pub fn bool_at(&self, at: &str) -> Result<bool, SettingsError> {
        self.typed(at, "boolean", Value::as_bool)
    }

    pub fn int_at(&self, at: &str) -> Result<i64, SettingsError> {
        self.typed(at, "integer", Value::as_i64)
    }

    pub fn float_at(&self, at: &str) -> Result<f64, SettingsError> {
        self.typed(at, "float", Value::as_f64)
    }

    pub fn str_at(&self, at: &str) -> Result<&str, SettingsError> {
        self.typed(at, "string", Value::as_str)
    }

    pub fn list_at(&self, at: &str) -> Result<&[Value], SettingsError> {
        self.typed(at, "list", |v| v.as_array().map(Vec::as_slice))
    }

    /// Deserialize the subtree at `at` into `T`
    pub fn deserialize_at<T: DeserializeOwned>(&self, at: &str) -> Result<T, SettingsError> {
        let value = self.get(at)?;
        T::deserialize(value).map_err(|e| SettingsError::TypeMismatch {
            path: at.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            found: e.to_string(),
        })
    }

    pub fn section<T: Section>(&self) -> Result<T, SettingsError> {
        self.deserialize_at(T::PATH)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.value)
    }
}
