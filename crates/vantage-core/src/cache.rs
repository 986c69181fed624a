//! Last-result cache keyed by query id.
//!
//! The engine stores the most recent result of every query so downstream
//! consumers (visualization, inspection tooling) can pull it later without
//! re-running the query. Last write wins; entries have no expiry and live
//! until the cache is cleared at environment teardown.

use std::collections::HashMap;

use crate::query::QueryResult;

/// Stores the latest [`QueryResult`] per query id.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    results: HashMap<String, QueryResult>,
}

impl ResultCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result, replacing any previous result for the same query id.
    pub fn store(&mut self, result: QueryResult) {
        self.results.insert(result.query_id.clone(), result);
    }

    /// The latest result for a query id.
    #[must_use]
    pub fn get(&self, query_id: &str) -> Option<&QueryResult> {
        self.results.get(query_id)
    }

    /// Number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Drop all cached results.
    pub fn clear(&mut self) {
        self.results.clear();
    }
}
