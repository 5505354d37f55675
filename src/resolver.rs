//! Resolver
//!
//! Merges the defaults store with the override layers applying to a
//! context and caches the result per context. Resolution is pure and
//! synchronous: the defaults and schema never change after startup, and
//! each call works on one consistent layer snapshot.

pub mod cache;
pub mod merge;
pub mod tree;

use crate::defaults::DefaultsStore;
use crate::digest::short_hex;
use crate::error::SettingsError;
use crate::layers::scope::{ResolutionContext, Scope};
use crate::layers::{LayerSnapshot, LayerStack};
use crate::schema::{blender, path, Schema};
use cache::{CacheStats, ResolveCache};
use merge::apply_overlay;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use tree::ResolvedTree;

/// Where a resolved value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOrigin {
    Defaults,
    Layer(Scope),
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueOrigin::Defaults => write!(f, "defaults"),
            ValueOrigin::Layer(scope) => write!(f, "{}", scope),
        }
    }
}

/// Settings resolution engine for one schema
pub struct Resolver {
    schema: Arc<Schema>,
    defaults: Arc<DefaultsStore>,
    layers: LayerStack,
    cache: Arc<ResolveCache>,
}

impl Resolver {
    /// Create a resolver with caching enabled
    pub fn new(defaults: DefaultsStore) -> Self {
        Self::with_cache(defaults, true)
    }

    pub fn with_cache(defaults: DefaultsStore, cache_enabled: bool) -> Self {
        let schema = defaults.schema().clone();
        let cache = Arc::new(ResolveCache::new(cache_enabled));
        Self {
            layers: LayerStack::new(schema.clone(), cache.clone()),
            schema,
            defaults: Arc::new(defaults),
            cache,
        }
    }

    /// Resolver over the built-in Blender schema and its factory defaults
    pub fn blender(cache_enabled: bool) -> Result<Self, SettingsError> {
        let schema = Arc::new(blender::schema()?);
        Ok(Self::with_cache(DefaultsStore::factory(schema)?, cache_enabled))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn defaults(&self) -> &DefaultsStore {
        &self.defaults
    }

    /// Override layers; mutations through the stack invalidate this resolver's cache
    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve the settings tree for `context`.
    ///
    /// Layers apply lowest precedence first on top of a copy of the
    /// defaults. A cached tree is returned when the layers applying to the
    /// context are unchanged since it was computed.
    pub fn resolve(&self, context: &ResolutionContext) -> Arc<ResolvedTree> {
        self.resolve_in(&self.layers.snapshot(), context)
    }

    fn resolve_in(
        &self,
        snapshot: &LayerSnapshot,
        context: &ResolutionContext,
    ) -> Arc<ResolvedTree> {
        let digest = snapshot.digest_for(context);

        if let Some(tree) = self.cache.lookup(context, &digest) {
            debug!(context = %context, digest = %short_hex(&digest), "Resolution cache hit");
            return tree;
        }

        let layers = snapshot.for_context(context);
        let mut value = self.defaults.document().clone();
        for layer in &layers {
            apply_overlay(self.schema.root(), &mut value, &layer.document);
        }

        let tree = Arc::new(ResolvedTree::new(
            context.clone(),
            value,
            layers.iter().map(|l| l.scope.clone()).collect(),
            digest,
            self.schema.clone(),
        ));
        debug!(
            context = %context,
            layers = layers.len(),
            digest = %short_hex(&digest),
            "Resolved settings"
        );
        self.cache.store(context.clone(), digest, tree.clone());
        tree
    }

    /// Report which layer supplies the value at `at` for `context`.
    ///
    /// The highest-precedence layer whose document sets the path wins;
    /// otherwise the value comes from the defaults. Values materialised
    /// from a mapping template count as defaults.
    pub fn explain(
        &self,
        context: &ResolutionContext,
        at: &str,
    ) -> Result<ValueOrigin, SettingsError> {
        self.schema.describe(at)?;
        let segments = path::segments(at)?;
        let snapshot = self.layers.snapshot();
        self.resolve_in(&snapshot, context).get(at)?;

        let origin = snapshot
            .for_context(context)
            .iter()
            .rev()
            .find(|layer| sets_path(&layer.document, &segments))
            .map(|layer| ValueOrigin::Layer(layer.scope.clone()))
            .unwrap_or(ValueOrigin::Defaults);
        Ok(origin)
    }
}

/// Whether a document carries a value at `segments`, or at a list above
/// them (lists replace wholesale, so the whole list comes from that layer)
fn sets_path(document: &Value, segments: &[&str]) -> bool {
    let mut current = document;
    for segment in segments {
        if current.is_array() {
            return true;
        }
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}
