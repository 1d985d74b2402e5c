// Copyright 2025 Sqlweave Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Compiled expression cache
//!
//! Template nodes compile their predicates through a shared cache so that
//! the same expression text is parsed once per process.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Expression;
use crate::core::Result;

/// Process-wide cache used by node constructors
static GLOBAL_CACHE: OnceLock<ExpressionCache> = OnceLock::new();

/// Get the global expression cache
#[inline]
pub fn global_cache() -> &'static ExpressionCache {
    GLOBAL_CACHE.get_or_init(ExpressionCache::new)
}

/// Thread-safe cache of compiled expressions keyed by source text
///
/// Compilation failures are not cached.
#[derive(Default)]
pub struct ExpressionCache {
    entries: RwLock<FxHashMap<String, Arc<Expression>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached expression for `source`, compiling it on a miss
    pub fn get_or_compile(&self, source: &str) -> Result<Arc<Expression>> {
        if let Some(expr) = self.entries.read().get(source) {
            tracing::trace!(expr = source, "expression cache hit");
            return Ok(Arc::clone(expr));
        }

        tracing::trace!(expr = source, "expression cache miss");
        let compiled = Arc::new(Expression::compile(source)?);
        let mut entries = self.entries.write();
        // another thread may have compiled the same source meanwhile
        let entry = entries
            .entry(source.to_string())
            .or_insert_with(|| compiled);
        Ok(Arc::clone(entry))
    }

    /// Look up without compiling
    pub fn get(&self, source: &str) -> Option<Arc<Expression>> {
        self.entries.read().get(source).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached expression
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for ExpressionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_once() {
        let cache = ExpressionCache::new();
        let a = cache.get_or_compile("x > 1").unwrap();
        let b = cache.get_or_compile("x > 1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_not_cached() {
        let cache = ExpressionCache::new();
        assert!(cache.get_or_compile("x >").is_err());
        assert!(cache.is_empty());
        assert!(cache.get("x >").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = ExpressionCache::new();
        cache.get_or_compile("1").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(ExpressionCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_compile("a && b").map(|e| e.source().len()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(6));
        }
        assert_eq!(cache.len(), 1);
    }
}
