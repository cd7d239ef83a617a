//! Memoized rewriting, keyed by content hash.
//!
//! The rewrite pipeline is deterministic, so a cache keyed on the input text
//! preserves its observable behavior exactly. Hosts call the preprocessor
//! once per binding string, and markup tends to repeat the same fragments,
//! so hits are common. Entries are append-only: a hash uniquely identifies
//! its input, so the same key always maps to the same output.

use std::collections::HashMap;

use crate::error::Error;
use crate::rewrite::RewriteOptions;
use crate::rewrite_source_with;

/// A memoizing wrapper around [`crate::rewrite_source`].
///
/// Only successful rewrites are cached; failing inputs surface their error
/// on every call, since callers are expected not to retry them.
pub struct RewriteCache {
    options: RewriteOptions,
    entries: HashMap<blake3::Hash, String>,
}

impl RewriteCache {
    pub fn new(options: RewriteOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
        }
    }

    /// Rewrite `source`, reusing the stored output when the same text has
    /// been seen before.
    pub fn rewrite(&mut self, source: &str) -> Result<String, Error> {
        let key = blake3::hash(source.as_bytes());
        if let Some(hit) = self.entries.get(&key) {
            return Ok(hit.clone());
        }
        let output = rewrite_source_with(source, &self.options)?;
        self.entries.insert(key, output.clone());
        Ok(output)
    }

    /// Number of cached rewrites.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RewriteCache {
    fn default() -> Self {
        Self::new(RewriteOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite_source;

    #[test]
    fn test_cache_matches_direct_rewrite() {
        let mut cache = RewriteCache::default();
        let direct = rewrite_source("x => x + 1").unwrap();
        assert_eq!(cache.rewrite("x => x + 1").unwrap(), direct);
        assert_eq!(cache.rewrite("x => x + 1").unwrap(), direct);
    }

    #[test]
    fn test_one_entry_per_distinct_input() {
        let mut cache = RewriteCache::default();
        cache.rewrite("x => x").unwrap();
        cache.rewrite("x => x").unwrap();
        assert_eq!(cache.len(), 1);
        cache.rewrite("y => y").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = RewriteCache::default();
        assert!(cache.rewrite("x =>").is_err());
        assert!(cache.is_empty());
        assert!(cache.rewrite("x =>").is_err());
    }
}
