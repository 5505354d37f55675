//! Resolution cache keyed by context and layer-stack digest.

use crate::digest::Digest;
use crate::layers::scope::{ResolutionContext, Scope};
use crate::resolver::tree::ResolvedTree;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct CacheEntry {
    digest: Digest,
    tree: Arc<ResolvedTree>,
}

/// Counters reported by [`ResolveCache::stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// One resolved tree per context.
///
/// An entry only hits when the digest of the layers applying to its context
/// is unchanged, so a tree computed from an older snapshot is never served.
pub struct ResolveCache {
    enabled: bool,
    entries: RwLock<HashMap<ResolutionContext, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolveCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub(crate) fn lookup(
        &self,
        context: &ResolutionContext,
        digest: &Digest,
    ) -> Option<Arc<ResolvedTree>> {
        if !self.enabled {
            return None;
        }
        let hit = self
            .entries
            .read()
            .get(context)
            .filter(|entry| &entry.digest == digest)
            .map(|entry| entry.tree.clone());
        match hit {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        hit
    }

    pub(crate) fn store(&self, context: ResolutionContext, digest: Digest, tree: Arc<ResolvedTree>) {
        if self.enabled {
            self.entries.write().insert(context, CacheEntry { digest, tree });
        }
    }

    /// Drop every entry whose context the scope applies to; returns the count
    pub fn invalidate_scope(&self, scope: &Scope) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|context, _| !scope.applies_to(context));
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }
}
