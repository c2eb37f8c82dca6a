// Memoization keyed by exact source text.
//
// Building a schema and parsing a document are the expensive steps of an
// extraction; the traversal itself is linear in the document. Callers that
// extract many documents against one schema (or re-extract the same
// persisted queries) can share one `ExtractionCache` across threads: the
// cached values are immutable once built, so lookups only take a read lock.

use crate::parse::{parse_document, DEFAULT_DOCUMENT_NAME};
use crate::{extract_from_document, CoordinateSet, PreparedSchema, Result};
use apollo_compiler::ast;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Entry limit per map used by [`ExtractionCache::default`].
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

type TextKeyed<T> = RwLock<HashMap<Arc<str>, Arc<T>>>;

/// Thread-safe cache of built schemas and parsed documents.
///
/// Failed parses are not cached. When a map reaches its entry limit it is
/// cleared before the next insertion.
#[derive(Debug)]
pub struct ExtractionCache {
    schemas: TextKeyed<PreparedSchema>,
    documents: TextKeyed<ast::Document>,
    max_entries: usize,
}

impl Default for ExtractionCache {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl ExtractionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A limit of zero is treated as one.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Same result as [`crate::extract_schema_coordinates`], reusing cached
    /// schema and document builds.
    #[tracing::instrument(skip_all, fields(document_len = document_text.len(), schema_len = schema_text.len()))]
    pub fn extract(&self, document_text: &str, schema_text: &str) -> Result<CoordinateSet> {
        let schema = self.schema(schema_text)?;
        let document = self.document(document_text)?;
        extract_from_document(&document, &schema)
    }

    /// The prepared schema for `sdl`, building it on first use.
    pub fn schema(&self, sdl: &str) -> Result<Arc<PreparedSchema>> {
        if let Some(hit) = lookup(&self.schemas, sdl) {
            tracing::trace!("Schema cache hit");
            return Ok(hit);
        }
        let built = Arc::new(PreparedSchema::parse(sdl)?);
        insert(&self.schemas, sdl, Arc::clone(&built), self.max_entries);
        Ok(built)
    }

    /// The parsed document for `text`, parsing it on first use.
    pub fn document(&self, text: &str) -> Result<Arc<ast::Document>> {
        if let Some(hit) = lookup(&self.documents, text) {
            tracing::trace!("Document cache hit");
            return Ok(hit);
        }
        let parsed = Arc::new(parse_document(text, DEFAULT_DOCUMENT_NAME)?);
        insert(&self.documents, text, Arc::clone(&parsed), self.max_entries);
        Ok(parsed)
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.read().len()
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }

    pub fn clear(&self) {
        self.schemas.write().clear();
        self.documents.write().clear();
    }
}

fn lookup<T>(map: &TextKeyed<T>, key: &str) -> Option<Arc<T>> {
    map.read().get(key).cloned()
}

fn insert<T>(map: &TextKeyed<T>, key: &str, value: Arc<T>, max_entries: usize) {
    let mut guard = map.write();
    if guard.len() >= max_entries && !guard.contains_key(key) {
        tracing::debug!(entries = guard.len(), "Cache full, clearing");
        guard.clear();
    }
    guard.insert(Arc::from(key), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract_schema_coordinates, CoordinateError};

    const SCHEMA: &str = "type Query { user: User } type User { id: ID name: String }";

    #[test]
    fn test_cached_extract_matches_uncached() {
        let cache = ExtractionCache::new();
        let doc = "{ user { id name } }";

        let cached = cache.extract(doc, SCHEMA).unwrap();
        let uncached = extract_schema_coordinates(doc, SCHEMA).unwrap();
        assert_eq!(cached, uncached);
    }

    #[test]
    fn test_schema_built_once_per_text() {
        let cache = ExtractionCache::new();
        let first = cache.schema(SCHEMA).unwrap();
        let second = cache.schema(SCHEMA).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.schema_count(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ExtractionCache::new();
        let err = cache.extract("{ user { id }", SCHEMA).unwrap_err();

        assert!(matches!(err, CoordinateError::Syntax { .. }));
        assert_eq!(cache.document_count(), 0);
        assert_eq!(cache.schema_count(), 1);
    }

    #[test]
    fn test_full_cache_is_cleared() {
        let cache = ExtractionCache::with_max_entries(2);
        cache.document("{ a }").unwrap();
        cache.document("{ b }").unwrap();
        assert_eq!(cache.document_count(), 2);

        cache.document("{ c }").unwrap();
        assert_eq!(cache.document_count(), 1);
    }

    #[test]
    fn test_concurrent_readers() {
        let cache = ExtractionCache::new();
        let documents = ["{ user { id } }", "{ user { name } }", "{ user { id name } }"];

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for doc in documents {
                        let coords = cache.extract(doc, SCHEMA).unwrap();
                        assert!(coords.contains("Query.user"));
                    }
                });
            }
        });

        assert_eq!(cache.schema_count(), 1);
        assert_eq!(cache.document_count(), documents.len());
    }
}
