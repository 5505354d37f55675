//! Override Layer Stack
//!
//! Holds the sparse override documents (studio, project, task) that sit on
//! top of the defaults. Readers take an immutable snapshot; mutations build a
//! new snapshot under a single-writer lock and swap it in atomically, then
//! drop every cached resolution the changed layer could affect before
//! returning.

pub mod scope;
pub mod source;

use crate::digest::{combine, document_digest, short_hex, Digest};
use crate::error::{SettingsError, SourceError};
use crate::resolver::cache::ResolveCache;
use crate::schema::{value_shape, Schema};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use scope::{ResolutionContext, Scope};
use serde_json::Value;
use source::DocumentSource;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One validated override document
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub scope: Scope,
    pub document: Value,
    pub digest: Digest,
    pub modified_at: DateTime<Utc>,
}

/// Immutable view of the loaded layers
#[derive(Debug, Clone, Default)]
pub struct LayerSnapshot {
    layers: BTreeMap<Scope, Arc<Layer>>,
}

impl LayerSnapshot {
    pub fn get(&self, scope: &Scope) -> Option<&Arc<Layer>> {
        self.layers.get(scope)
    }

    /// Loaded scopes, lowest precedence first
    pub fn scopes(&self) -> Vec<Scope> {
        self.layers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers applying to `context`, lowest precedence first
    pub fn for_context(&self, context: &ResolutionContext) -> Vec<Arc<Layer>> {
        context
            .scopes()
            .iter()
            .filter_map(|scope| self.layers.get(scope).cloned())
            .collect()
    }

    /// Digest of the layers applying to `context`
    pub fn digest_for(&self, context: &ResolutionContext) -> Digest {
        let layers = self.for_context(context);
        let labels: Vec<String> = layers.iter().map(|l| l.scope.to_string()).collect();
        combine(labels.iter().map(String::as_str).zip(layers.iter().map(|l| &l.digest)))
    }
}

/// Outcome of [`LayerStack::sync`]
#[derive(Debug, Default)]
pub struct SyncReport {
    pub loaded: Vec<Scope>,
    pub reloaded: Vec<Scope>,
    pub removed: Vec<Scope>,
    pub unchanged: usize,
    /// Documents that could not be read or failed validation
    pub rejected: Vec<(Scope, SourceError)>,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        !(self.loaded.is_empty() && self.reloaded.is_empty() && self.removed.is_empty())
    }
}

/// Ordered override layers shared by all resolutions
pub struct LayerStack {
    schema: Arc<Schema>,
    current: RwLock<Arc<LayerSnapshot>>,
    writer: Mutex<()>,
    cache: Arc<ResolveCache>,
}

enum Mutation {
    Push,
    Replace,
    Upsert,
}

impl LayerStack {
    pub fn new(schema: Arc<Schema>, cache: Arc<ResolveCache>) -> Self {
        Self {
            schema,
            current: RwLock::new(Arc::new(LayerSnapshot::default())),
            writer: Mutex::new(()),
            cache,
        }
    }

    /// Consistent view of the loaded layers
    pub fn snapshot(&self) -> Arc<LayerSnapshot> {
        self.current.read().clone()
    }

    /// Add a new layer. Fails with `LayerExists` if the scope is loaded.
    pub fn push(&self, layer_name: &str, document: Value) -> Result<(), SettingsError> {
        self.write_layer(layer_name.parse()?, document, Utc::now(), Mutation::Push)
    }

    /// Swap the document of a loaded layer. Fails with `LayerNotFound` otherwise.
    pub fn replace(&self, layer_name: &str, document: Value) -> Result<(), SettingsError> {
        self.write_layer(layer_name.parse()?, document, Utc::now(), Mutation::Replace)
    }

    /// Insert or replace a layer
    pub fn upsert(&self, layer_name: &str, document: Value) -> Result<(), SettingsError> {
        self.write_layer(layer_name.parse()?, document, Utc::now(), Mutation::Upsert)
    }

    /// Unload a layer, returning it
    pub fn remove(&self, layer_name: &str) -> Result<Arc<Layer>, SettingsError> {
        self.remove_scope(&layer_name.parse()?)
    }

    pub fn remove_scope(&self, scope: &Scope) -> Result<Arc<Layer>, SettingsError> {
        let _writer = self.writer.lock();
        let mut next = LayerSnapshot::clone(&self.snapshot());
        let removed = next
            .layers
            .remove(scope)
            .ok_or_else(|| SettingsError::LayerNotFound(scope.to_string()))?;
        self.publish(scope, next);
        Ok(removed)
    }

    /// Validate and store a layer. The document is checked in full before
    /// anything is published; a rejected document leaves the stack untouched.
    fn write_layer(
        &self,
        scope: Scope,
        document: Value,
        modified_at: DateTime<Utc>,
        mutation: Mutation,
    ) -> Result<(), SettingsError> {
        if !document.is_object() {
            return Err(SettingsError::TypeMismatch {
                path: scope.to_string(),
                expected: "settings document (object)".to_string(),
                found: value_shape(&document),
            });
        }
        self.schema.validate_override(&document).map_err(|e| {
            warn!(layer = %scope, error = %e, "Rejected override layer");
            e
        })?;

        let layer = Layer {
            digest: document_digest(&document),
            scope: scope.clone(),
            document,
            modified_at,
        };

        let _writer = self.writer.lock();
        let mut next = LayerSnapshot::clone(&self.snapshot());
        let exists = next.layers.contains_key(&scope);
        match mutation {
            Mutation::Push if exists => return Err(SettingsError::LayerExists(scope.to_string())),
            Mutation::Replace if !exists => {
                return Err(SettingsError::LayerNotFound(scope.to_string()))
            }
            _ => {}
        }
        debug!(layer = %scope, digest = %short_hex(&layer.digest), "Layer stored");
        next.layers.insert(scope.clone(), Arc::new(layer));
        self.publish(&scope, next);
        Ok(())
    }

    /// Swap in the new snapshot, then invalidate before the writer lock drops
    fn publish(&self, scope: &Scope, next: LayerSnapshot) {
        *self.current.write() = Arc::new(next);
        let dropped = self.cache.invalidate_scope(scope);
        debug!(layer = %scope, dropped, "Invalidated cached resolutions");
    }

    /// Bring the stack in line with a document source.
    ///
    /// New documents are pushed, changed ones replaced and vanished ones
    /// removed. A document that cannot be read or fails validation is
    /// reported in `rejected` and the previously loaded layer, if any, stays
    /// in place. Only a failure to list the source aborts, before anything
    /// is written.
    pub fn sync(&self, source: &dyn DocumentSource) -> Result<SyncReport, SourceError> {
        let mut report = SyncReport::default();
        let before = self.snapshot();
        let listed: BTreeSet<Scope> = source.list()?.into_iter().collect();

        for scope in &listed {
            let stored = match source.read(scope) {
                Ok(Some(stored)) => stored,
                Ok(None) => continue,
                Err(e) => {
                    warn!(layer = %scope, error = %e, "Unreadable override document");
                    report.rejected.push((scope.clone(), e));
                    continue;
                }
            };
            let existing = before.get(scope);
            if let Some(layer) = existing {
                if layer.digest == document_digest(&stored.document) {
                    report.unchanged += 1;
                    continue;
                }
            }
            match self.write_layer(
                scope.clone(),
                stored.document,
                stored.modified_at,
                Mutation::Upsert,
            ) {
                Ok(()) if existing.is_some() => report.reloaded.push(scope.clone()),
                Ok(()) => report.loaded.push(scope.clone()),
                Err(e) => report.rejected.push((scope.clone(), e.into())),
            }
        }

        for scope in before.scopes() {
            if !listed.contains(&scope) && self.remove_scope(&scope).is_ok() {
                report.removed.push(scope);
            }
        }

        info!(
            loaded = report.loaded.len(),
            reloaded = report.reloaded.len(),
            removed = report.removed.len(),
            unchanged = report.unchanged,
            rejected = report.rejected.len(),
            "Override layers synced"
        );
        Ok(report)
    }
}
