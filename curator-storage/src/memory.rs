//! In-memory backends.
//!
//! Used by tests and by local development without external stores. The
//! in-memory index mirrors the ranking contract of the real index closely
//! enough to exercise the engine: weighted term matching over name/alias/
//! description, relevance ordering with a modification-time tie-break, and
//! immediate write visibility.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use curator_core::{
    CatalogDocument, CuratorError, CuratorResult, DocumentId, IndexedDocument, SearchHit,
    SearchRequest, SearchResults, StoreKind, TenantId,
};

use crate::traits::{DocumentCache, RecordStore, SearchIndex};

// Per-term field weights, matching the real index's boosts.
const NAME_WEIGHT: f64 = 3.0;
const ALIAS_WEIGHT: f64 = 2.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;

// ============================================================================
// RECORD STORE
// ============================================================================

/// In-memory system-of-record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    docs: RwLock<HashMap<DocumentId, CatalogDocument>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, as the external record-store owner would.
    pub fn insert(&self, doc: CatalogDocument) {
        self.docs
            .write()
            .expect("record store lock poisoned")
            .insert(doc.id, doc);
    }

    /// Remove a record.
    pub fn remove(&self, id: DocumentId) {
        self.docs
            .write()
            .expect("record store lock poisoned")
            .remove(&id);
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch(
        &self,
        id: DocumentId,
        tenant: &TenantId,
    ) -> CuratorResult<Option<CatalogDocument>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| CuratorError::store(StoreKind::Records, "lock poisoned"))?;
        // Tenant filter applied at fetch: wrong tenant looks like absence.
        Ok(docs
            .get(&id)
            .filter(|doc| doc.tenant_id == *tenant)
            .cloned())
    }
}

// ============================================================================
// SEARCH INDEX
// ============================================================================

/// In-memory search index with deterministic scoring.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: RwLock<HashMap<DocumentId, IndexedDocument>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents across all tenants.
    pub fn len(&self) -> usize {
        self.docs.read().expect("index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn score(doc: &IndexedDocument, terms: &[String]) -> f64 {
        let mut score = 0.0;
        for term in terms {
            score += field_score(doc.name.as_deref(), term) * NAME_WEIGHT;
            score += field_score(doc.alias.as_deref(), term) * ALIAS_WEIGHT;
            score += field_score(doc.description.as_deref(), term) * DESCRIPTION_WEIGHT;
        }
        score
    }
}

fn field_score(field: Option<&str>, term: &str) -> f64 {
    match field {
        Some(text) if text.to_lowercase().contains(term) => 1.0,
        _ => 0.0,
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn upsert(&self, doc: &IndexedDocument) -> CuratorResult<()> {
        self.docs
            .write()
            .map_err(|_| CuratorError::store(StoreKind::Index, "lock poisoned"))?
            .insert(doc.id, doc.clone());
        Ok(())
    }

    async fn get(&self, id: DocumentId) -> CuratorResult<Option<IndexedDocument>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| CuratorError::store(StoreKind::Index, "lock poisoned"))?;
        Ok(docs.get(&id).cloned())
    }

    async fn delete(&self, id: DocumentId) -> CuratorResult<()> {
        self.docs
            .write()
            .map_err(|_| CuratorError::store(StoreKind::Index, "lock poisoned"))?
            .remove(&id);
        Ok(())
    }

    async fn query(&self, req: &SearchRequest) -> CuratorResult<SearchResults> {
        let docs = self
            .docs
            .read()
            .map_err(|_| CuratorError::store(StoreKind::Index, "lock poisoned"))?;

        let terms: Vec<String> = req
            .query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let mut hits: Vec<SearchHit> = docs
            .values()
            .filter(|doc| doc.tenant_id == req.tenant)
            .filter(|doc| match req.status {
                Some(status) => doc.status == Some(status),
                None => true,
            })
            .filter_map(|doc| {
                if terms.is_empty() {
                    // Match-all: every tenant document, unscored.
                    return Some(SearchHit {
                        id: doc.id,
                        score: 0.0,
                        document: doc.clone(),
                    });
                }
                let score = MemoryIndex::score(doc, &terms);
                (score > 0.0).then(|| SearchHit {
                    id: doc.id,
                    score,
                    document: doc.clone(),
                })
            })
            .collect();

        // Relevance descending, then modification time descending; the id is
        // a final tie-break so identical inputs always order identically.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.document.modified_at.cmp(&a.document.modified_at))
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });

        let total = hits.len() as u64;
        let page = hits
            .into_iter()
            .skip(req.offset as usize)
            .take(req.size as usize)
            .collect();

        Ok(SearchResults {
            total,
            exact: true,
            hits: page,
        })
    }
}

// ============================================================================
// CACHE
// ============================================================================

/// In-memory TTL cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .expect("cache lock poisoned")
            .values()
            .filter(|(_, deadline)| *deadline > now)
            .count()
    }
}

#[async_trait]
impl DocumentCache for MemoryCache {
    async fn get(&self, key: &str) -> CuratorResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CuratorError::store(StoreKind::Cache, "lock poisoned"))?;
        Ok(entries.get(key).and_then(|(value, deadline)| {
            (*deadline > Instant::now()).then(|| value.clone())
        }))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> CuratorResult<()> {
        self.entries
            .write()
            .map_err(|_| CuratorError::store(StoreKind::Cache, "lock poisoned"))?
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CuratorResult<()> {
        self.entries
            .write()
            .map_err(|_| CuratorError::store(StoreKind::Cache, "lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    fn indexed(tenant_name: &str, name: &str, modified_secs: i64) -> IndexedDocument {
        IndexedDocument {
            id: DocumentId::from_uuid(Uuid::now_v7()),
            tenant_id: tenant(tenant_name),
            name: Some(name.to_string()),
            description: None,
            alias: None,
            status: Some(curator_core::DocStatus::Published),
            created_at: None,
            modified_at: Some(Utc.timestamp_opt(modified_secs, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_record_store_tenant_filter() {
        let store = MemoryRecordStore::new();
        let doc = CatalogDocument {
            id: DocumentId::from_uuid(Uuid::now_v7()),
            tenant_id: tenant("acme"),
            name: Some("Widget".to_string()),
            description: None,
            alias: None,
            status: None,
            created_at: None,
            modified_at: None,
        };
        store.insert(doc.clone());

        assert!(store.fetch(doc.id, &tenant("acme")).await.unwrap().is_some());
        // Wrong tenant is indistinguishable from absence.
        assert!(store.fetch(doc.id, &tenant("globex")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_index_ranking_and_tiebreak() {
        let index = MemoryIndex::new();
        let blue = indexed("acme", "Blue Shirt Large", 100);
        let red = indexed("acme", "Red Shirt", 200);
        index.upsert(&blue).await.unwrap();
        index.upsert(&red).await.unwrap();

        // "blue shirt" matches both terms on the blue document, one on red.
        let req = SearchRequest::new(tenant("acme"), "blue shirt");
        let results = index.query(&req).await.unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.hits[0].id, blue.id);
        assert!(results.hits[0].score > results.hits[1].score);

        // Empty query: match-all, most recently modified first.
        let req = SearchRequest::new(tenant("acme"), "");
        let results = index.query(&req).await.unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.hits[0].id, red.id);
    }

    #[tokio::test]
    async fn test_index_query_never_crosses_tenants() {
        let index = MemoryIndex::new();
        index.upsert(&indexed("acme", "Widget", 1)).await.unwrap();
        index.upsert(&indexed("globex", "Widget", 2)).await.unwrap();

        let results = index
            .query(&SearchRequest::new(tenant("acme"), "widget"))
            .await
            .unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].document.tenant_id, tenant("acme"));
    }

    #[tokio::test]
    async fn test_index_status_filter() {
        let index = MemoryIndex::new();
        let mut draft = indexed("acme", "Widget", 1);
        draft.status = Some(curator_core::DocStatus::Draft);
        index.upsert(&draft).await.unwrap();
        index.upsert(&indexed("acme", "Widget", 2)).await.unwrap();

        let req = SearchRequest::new(tenant("acme"), "widget")
            .with_status(curator_core::DocStatus::Draft);
        let results = index.query(&req).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].id, draft.id);
    }

    #[tokio::test]
    async fn test_index_pagination() {
        let index = MemoryIndex::new();
        for i in 0..5 {
            index.upsert(&indexed("acme", "Widget", i)).await.unwrap();
        }

        let req = SearchRequest::new(tenant("acme"), "widget")
            .with_offset(2)
            .with_size(2);
        let results = index.query(&req).await.unwrap();
        assert_eq!(results.total, 5);
        assert_eq!(results.hits.len(), 2);
    }

    #[tokio::test]
    async fn test_memory_cache_expiry() {
        let cache = MemoryCache::new();
        cache
            .put("k", "v", Duration::from_millis(20))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cache_delete() {
        let cache = MemoryCache::new();
        cache.put("k", "v", Duration::from_secs(60)).await.unwrap();
        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }
}
