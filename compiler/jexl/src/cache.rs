//! Compiled-source cache.
//!
//! Keys hold the full source text, so an entry can never be stale. Sources
//! longer than the threshold bypass the cache; capacity is bounded with
//! least-recently-used eviction.

use std::num::NonZeroUsize;
use std::sync::Arc;

use jexl_ir::Lambda;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

/// What a source was compiled as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SourceKind {
    Expression,
    Script,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub kind: SourceKind,
    pub source: String,
    pub params: Vec<String>,
}

pub(crate) struct AstCache {
    entries: Mutex<LruCache<CacheKey, Arc<Lambda>>>,
    threshold: usize,
}

impl AstCache {
    /// `None` when `capacity` is zero.
    pub fn new(capacity: usize, threshold: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(AstCache {
            entries: Mutex::new(LruCache::new(capacity)),
            threshold,
        })
    }

    pub fn accepts(&self, source: &str) -> bool {
        source.len() <= self.threshold
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Lambda>> {
        let found = self.entries.lock().get(key).map(Arc::clone);
        debug!(hit = found.is_some(), kind = ?key.kind, "ast cache lookup");
        found
    }

    pub fn insert(&self, key: CacheKey, lambda: Arc<Lambda>) {
        if let Some((evicted, _)) = self.entries.lock().push(key, lambda) {
            debug!(kind = ?evicted.kind, "ast cache eviction");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
