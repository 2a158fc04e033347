//! Compiled selector cache
//!
//! Parsing a selector is cheap but not free; callers that run the same
//! expressions repeatedly keep them in an LRU keyed by the source text.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::parser::SelectorList;
use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::error::Result;

/// Default number of cached selectors
pub const DEFAULT_CAPACITY: usize = 64;

pub struct SelectorCache {
    cache: LruCache<String, Arc<SelectorList>>,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SelectorCache {
    /// Create a cache holding up to `capacity` selectors (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        SelectorCache {
            cache: LruCache::new(capacity),
        }
    }

    /// Parsed form of `expr`, parsing it on a miss
    pub fn get(&mut self, expr: &str) -> Result<Arc<SelectorList>> {
        if let Some(list) = self.cache.get(expr) {
            return Ok(Arc::clone(list));
        }
        let list = Arc::new(SelectorList::parse(expr)?);
        tracing::trace!(expr, "compiled selector");
        self.cache.put(expr.to_string(), Arc::clone(&list));
        Ok(list)
    }

    /// Select with a cached selector
    pub fn select(&mut self, doc: &Document<'_>, expr: &str) -> Result<Vec<NodeId>> {
        Ok(self.get(expr)?.select(doc))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    #[test]
    fn test_hit_returns_same_selector() {
        let mut cache = SelectorCache::default();
        let a = cache.get("div > p").unwrap();
        let b = cache.get("div > p").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction() {
        let mut cache = SelectorCache::new(2);
        let a = cache.get("a").unwrap();
        cache.get("b").unwrap();
        cache.get("c").unwrap();
        assert_eq!(cache.len(), 2);
        let a2 = cache.get("a").unwrap();
        assert!(!Arc::ptr_eq(&a, &a2));
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = SelectorCache::new(0);
        assert!(cache.get("a >").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_select() {
        let mut buf = b"<div><p>a</p></div>".to_vec();
        let doc = Document::parse(&mut buf, ParseOptions::default()).unwrap();
        let mut cache = SelectorCache::default();
        assert_eq!(cache.select(&doc, "p").unwrap().len(), 1);
        assert_eq!(cache.select(&doc, "p").unwrap().len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
