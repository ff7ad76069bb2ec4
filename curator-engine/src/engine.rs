//! The synchronization engine.
//!
//! Orchestrates the three stores without any cross-store transaction:
//!
//! - **index**: fetch (tenant-filtered) → project → acknowledged upsert →
//!   best-effort cache invalidation, in that order. Invalidation comes after
//!   the write so no reader can re-populate the key from pre-write state and
//!   have it survive.
//! - **search**: cache-aside over the derived request key.
//! - **get**: cache-aside over the document key, with the tenant ownership
//!   check folded into the miss path.
//! - **delete**: ownership check first, then acknowledged delete, then
//!   invalidation. Deleting before the check would let a tenant remove
//!   another tenant's document by guessing identifiers.
//!
//! Record-store and index failures on the critical path abort the operation.
//! Cache failures never do: every cache interaction is wrapped so that an
//! error or timeout degrades to a miss or no-op with a warning. A stale
//! cache entry self-heals at TTL expiry; a failed index write would not.

use std::future::Future;
use std::sync::Arc;

use curator_core::{
    CacheKeys, CuratorError, CuratorResult, DocumentId, IndexedDocument, SearchRequest,
    SearchResults, StoreKind, TenantId,
};
use curator_storage::{DocumentCache, RecordStore, SearchIndex};

use crate::config::EngineConfig;

/// Synchronization engine over the three store adapters.
///
/// Cheap to clone; all adapters are shared and long-lived.
#[derive(Clone)]
pub struct SyncEngine {
    records: Arc<dyn RecordStore>,
    index: Arc<dyn SearchIndex>,
    cache: Arc<dyn DocumentCache>,
    keys: CacheKeys,
    config: EngineConfig,
}

impl SyncEngine {
    pub fn new(
        records: Arc<dyn RecordStore>,
        index: Arc<dyn SearchIndex>,
        cache: Arc<dyn DocumentCache>,
        keys: CacheKeys,
        config: EngineConfig,
    ) -> Self {
        Self {
            records,
            index,
            cache,
            keys,
            config,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Index a document from the system of record.
    ///
    /// The tenant filter is part of the record fetch, so an identifier owned
    /// by another tenant fails with the same `NotFound` as a missing one.
    /// The upsert is acknowledged: once this returns, the document is visible
    /// to queries. Cache invalidation of the single-document key follows the
    /// write and is best-effort.
    pub async fn index_document(
        &self,
        tenant: &TenantId,
        id: DocumentId,
    ) -> CuratorResult<DocumentId> {
        let record = self
            .timed(StoreKind::Records, self.records.fetch(id, tenant))
            .await?
            .ok_or_else(|| CuratorError::not_found(id))?;

        let doc = IndexedDocument::project(&record);
        self.timed(StoreKind::Index, self.index.upsert(&doc)).await?;

        self.cache_delete(&self.keys.document(tenant, id)).await;

        tracing::debug!(tenant = %tenant, id = %id, "indexed document");
        Ok(id)
    }

    /// Tenant-scoped ranked search, cached under the derived request key.
    ///
    /// A cache hit is returned verbatim; cached pages may be up to the
    /// configured TTL stale, which callers accept by contract.
    pub async fn search(&self, req: &SearchRequest) -> CuratorResult<SearchResults> {
        let key = self.keys.search(req);

        if let Some(raw) = self.cache_get(&key).await {
            match serde_json::from_str::<SearchResults>(&raw) {
                Ok(results) => {
                    tracing::debug!(key = %key, "search served from cache");
                    return Ok(results);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "undecodable cache entry, ignoring");
                }
            }
        }

        let results = self.timed(StoreKind::Index, self.index.query(req)).await?;

        match serde_json::to_string(&results) {
            Ok(raw) => self.cache_put(&key, &raw).await,
            Err(e) => tracing::warn!(error = %e, "failed to serialize results for cache"),
        }

        Ok(results)
    }

    /// Fetch a single document, cache-aside.
    ///
    /// The index's get-by-id has no tenant scope, so ownership is checked on
    /// the fetched document. A mismatch is reported as `NotFound`, identical
    /// to absence, so existence never leaks across tenants.
    pub async fn get_document(
        &self,
        tenant: &TenantId,
        id: DocumentId,
    ) -> CuratorResult<IndexedDocument> {
        let key = self.keys.document(tenant, id);

        if let Some(raw) = self.cache_get(&key).await {
            match serde_json::from_str::<IndexedDocument>(&raw) {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "undecodable cache entry, ignoring");
                }
            }
        }

        let doc = self.fetch_owned(tenant, id).await?;

        match serde_json::to_string(&doc) {
            Ok(raw) => self.cache_put(&key, &raw).await,
            Err(e) => tracing::warn!(error = %e, "failed to serialize document for cache"),
        }

        Ok(doc)
    }

    /// Delete a document from the index.
    ///
    /// Ownership is verified before the delete is issued; the order is
    /// load-bearing and must not be reversed. The delete is acknowledged,
    /// then the single-document cache key is invalidated best-effort.
    pub async fn delete_document(&self, tenant: &TenantId, id: DocumentId) -> CuratorResult<()> {
        self.fetch_owned(tenant, id).await?;

        self.timed(StoreKind::Index, self.index.delete(id)).await?;

        self.cache_delete(&self.keys.document(tenant, id)).await;

        tracing::debug!(tenant = %tenant, id = %id, "deleted document");
        Ok(())
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Fetch from the index and enforce tenant ownership.
    ///
    /// Absence and wrong-tenant produce the same error value.
    async fn fetch_owned(
        &self,
        tenant: &TenantId,
        id: DocumentId,
    ) -> CuratorResult<IndexedDocument> {
        let doc = self
            .timed(StoreKind::Index, self.index.get(id))
            .await?
            .ok_or_else(|| CuratorError::not_found(id))?;

        if doc.tenant_id != *tenant {
            return Err(CuratorError::not_found(id));
        }
        Ok(doc)
    }

    /// Run a store call under the per-call timeout.
    async fn timed<T, F>(&self, kind: StoreKind, fut: F) -> CuratorResult<T>
    where
        F: Future<Output = CuratorResult<T>>,
    {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CuratorError::Timeout {
                kind,
                millis: self.config.call_timeout.as_millis() as u64,
            }),
        }
    }

    /// Cache read that degrades any failure to a miss.
    async fn cache_get(&self, key: &str) -> Option<String> {
        match self.timed(StoreKind::Cache, self.cache.get(key)).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Best-effort cache write.
    async fn cache_put(&self, key: &str, value: &str) {
        let ttl = self.config.cache_ttl;
        if let Err(e) = self
            .timed(StoreKind::Cache, self.cache.put(key, value, ttl))
            .await
        {
            tracing::warn!(key = %key, error = %e, "cache write failed, continuing");
        }
    }

    /// Best-effort cache invalidation.
    async fn cache_delete(&self, key: &str) {
        if let Err(e) = self.timed(StoreKind::Cache, self.cache.delete(key)).await {
            tracing::warn!(key = %key, error = %e, "cache invalidation failed, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use curator_core::{CatalogDocument, DocStatus};
    use curator_storage::{MemoryCache, MemoryIndex, MemoryRecordStore, NoopCache};
    use std::time::Duration;
    use uuid::Uuid;

    /// A cache whose every call fails, proving the engine's asymmetric
    /// failure policy: the cache must never fail an operation.
    struct PoisonedCache;

    #[async_trait]
    impl DocumentCache for PoisonedCache {
        async fn get(&self, _key: &str) -> CuratorResult<Option<String>> {
            Err(CuratorError::store(StoreKind::Cache, "down"))
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> CuratorResult<()> {
            Err(CuratorError::store(StoreKind::Cache, "down"))
        }

        async fn delete(&self, _key: &str) -> CuratorResult<()> {
            Err(CuratorError::store(StoreKind::Cache, "down"))
        }
    }

    /// An index whose reads hang past any reasonable timeout.
    struct StalledIndex;

    #[async_trait]
    impl SearchIndex for StalledIndex {
        async fn upsert(&self, _doc: &IndexedDocument) -> CuratorResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn get(&self, _id: DocumentId) -> CuratorResult<Option<IndexedDocument>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }

        async fn delete(&self, _id: DocumentId) -> CuratorResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn query(&self, _req: &SearchRequest) -> CuratorResult<SearchResults> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(SearchResults::empty())
        }
    }

    struct Harness {
        records: Arc<MemoryRecordStore>,
        index: Arc<MemoryIndex>,
        engine: SyncEngine,
    }

    fn harness_with_cache(cache: Arc<dyn DocumentCache>) -> Harness {
        let records = Arc::new(MemoryRecordStore::new());
        let index = Arc::new(MemoryIndex::new());
        let engine = SyncEngine::new(
            records.clone(),
            index.clone(),
            cache,
            CacheKeys::new("curator:"),
            EngineConfig::default(),
        );
        Harness {
            records,
            index,
            engine,
        }
    }

    fn harness() -> Harness {
        harness_with_cache(Arc::new(MemoryCache::new()))
    }

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    fn record(tenant_name: &str, name: &str, modified_secs: i64) -> CatalogDocument {
        CatalogDocument {
            id: DocumentId::from_uuid(Uuid::now_v7()),
            tenant_id: tenant(tenant_name),
            name: Some(name.to_string()),
            description: None,
            alias: None,
            status: Some(DocStatus::Published),
            created_at: Some(Utc.timestamp_opt(modified_secs, 0).unwrap()),
            modified_at: Some(Utc.timestamp_opt(modified_secs, 0).unwrap()),
        }
    }

    // ------------------------------------------------------------------
    // Index operation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_then_search_read_your_writes() {
        let h = harness();
        let doc = record("acme-tenant", "Blue Shirt Large", 100);
        h.records.insert(doc.clone());

        h.engine
            .index_document(&tenant("acme-tenant"), doc.id)
            .await
            .unwrap();

        let results = h
            .engine
            .search(&SearchRequest::new(tenant("acme-tenant"), "Blue Shirt Large"))
            .await
            .unwrap();
        assert!(results.hits.iter().any(|hit| hit.id == doc.id));
    }

    #[tokio::test]
    async fn test_index_unknown_id_not_found() {
        let h = harness();
        let err = h
            .engine
            .index_document(&tenant("acme-tenant"), DocumentId::from_uuid(Uuid::now_v7()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_index_wrong_tenant_not_found() {
        let h = harness();
        let doc = record("globex", "Widget", 1);
        h.records.insert(doc.clone());

        // The identifier exists, but under a different tenant: same error.
        let err = h
            .engine
            .index_document(&tenant("acme-tenant"), doc.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(h.index.is_empty());
    }

    #[tokio::test]
    async fn test_index_twice_is_idempotent() {
        let h = harness();
        let doc = record("acme-tenant", "Widget", 1);
        h.records.insert(doc.clone());

        h.engine
            .index_document(&tenant("acme-tenant"), doc.id)
            .await
            .unwrap();
        let first = h.index.get(doc.id).await.unwrap().unwrap();

        h.engine
            .index_document(&tenant("acme-tenant"), doc.id)
            .await
            .unwrap();
        let second = h.index.get(doc.id).await.unwrap().unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_index_invalidates_cached_document() {
        let h = harness();
        let mut doc = record("acme-tenant", "Old Name", 1);
        h.records.insert(doc.clone());
        let t = tenant("acme-tenant");

        h.engine.index_document(&t, doc.id).await.unwrap();
        // Populate the document cache.
        let before = h.engine.get_document(&t, doc.id).await.unwrap();
        assert_eq!(before.name.as_deref(), Some("Old Name"));

        // Record mutates externally, then is re-indexed.
        doc.name = Some("New Name".to_string());
        h.records.insert(doc.clone());
        h.engine.index_document(&t, doc.id).await.unwrap();

        // The next read must not observe the pre-update cached value.
        let after = h.engine.get_document(&t, doc.id).await.unwrap();
        assert_eq!(after.name.as_deref(), Some("New Name"));
    }

    // ------------------------------------------------------------------
    // Get operation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_cross_tenant_is_not_found() {
        let h = harness();
        let doc = record("tenant-one", "Secret Widget", 1);
        h.records.insert(doc.clone());
        h.engine
            .index_document(&tenant("tenant-one"), doc.id)
            .await
            .unwrap();

        let owner = h.engine.get_document(&tenant("tenant-one"), doc.id).await;
        assert!(owner.is_ok());

        let stranger = h
            .engine
            .get_document(&tenant("tenant-two"), doc.id)
            .await
            .unwrap_err();
        assert!(stranger.is_not_found());

        // Same error value as a genuinely absent document.
        let absent = h
            .engine
            .get_document(
                &tenant("tenant-two"),
                DocumentId::from_uuid(Uuid::now_v7()),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            (stranger, absent),
            (CuratorError::NotFound { .. }, CuratorError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_serves_from_cache_on_second_read() {
        let h = harness();
        let doc = record("acme-tenant", "Widget", 1);
        h.records.insert(doc.clone());
        let t = tenant("acme-tenant");
        h.engine.index_document(&t, doc.id).await.unwrap();

        let first = h.engine.get_document(&t, doc.id).await.unwrap();

        // Remove from the index; the cached copy still answers.
        h.index.delete(doc.id).await.unwrap();
        let second = h.engine.get_document(&t, doc.id).await.unwrap();
        assert_eq!(first, second);
    }

    // ------------------------------------------------------------------
    // Search operation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_search_ranking_example() {
        let h = harness();
        let t = tenant("acme-tenant");
        let blue = record("acme-tenant", "Blue Shirt Large", 100);
        let red = record("acme-tenant", "Red Shirt", 200);
        h.records.insert(blue.clone());
        h.records.insert(red.clone());
        h.engine.index_document(&t, blue.id).await.unwrap();
        h.engine.index_document(&t, red.id).await.unwrap();

        // "blue shirt" ranks the double match first.
        let results = h
            .engine
            .search(&SearchRequest::new(t.clone(), "blue shirt"))
            .await
            .unwrap();
        assert_eq!(results.hits[0].id, blue.id);

        // Empty query: both, most recently modified first.
        let results = h
            .engine
            .search(&SearchRequest::new(t.clone(), ""))
            .await
            .unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.hits[0].id, red.id);
        assert_eq!(results.hits[1].id, blue.id);
    }

    #[tokio::test]
    async fn test_search_result_is_cached_verbatim() {
        let h = harness();
        let t = tenant("acme-tenant");
        let doc = record("acme-tenant", "Widget", 1);
        h.records.insert(doc.clone());
        h.engine.index_document(&t, doc.id).await.unwrap();

        let req = SearchRequest::new(t.clone(), "widget");
        let first = h.engine.search(&req).await.unwrap();
        assert_eq!(first.total, 1);

        // A new document appears in the index, but the cached page answers
        // until the TTL elapses: bounded staleness by contract.
        let other = record("acme-tenant", "Widget Two", 2);
        h.records.insert(other.clone());
        h.engine.index_document(&t, other.id).await.unwrap();

        let second = h.engine.search(&req).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_search_cache_expiry_restores_freshness() {
        let records = Arc::new(MemoryRecordStore::new());
        let index = Arc::new(MemoryIndex::new());
        let engine = SyncEngine::new(
            records.clone(),
            index.clone(),
            Arc::new(MemoryCache::new()),
            CacheKeys::new("curator:"),
            EngineConfig::new().with_cache_ttl(Duration::from_millis(20)),
        );
        let t = tenant("acme-tenant");
        let doc = record("acme-tenant", "Widget", 1);
        records.insert(doc.clone());
        engine.index_document(&t, doc.id).await.unwrap();

        let req = SearchRequest::new(t.clone(), "widget");
        assert_eq!(engine.search(&req).await.unwrap().total, 1);

        let other = record("acme-tenant", "Widget Two", 2);
        records.insert(other.clone());
        engine.index_document(&t, other.id).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(engine.search(&req).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_search_pagination_defaults() {
        let h = harness();
        let t = tenant("acme-tenant");
        for i in 0..15 {
            let doc = record("acme-tenant", &format!("Widget {}", i), i);
            h.records.insert(doc.clone());
            h.engine.index_document(&t, doc.id).await.unwrap();
        }

        let results = h
            .engine
            .search(&SearchRequest::new(t.clone(), "widget"))
            .await
            .unwrap();
        assert_eq!(results.total, 15);
        assert_eq!(results.hits.len(), 10);
    }

    // ------------------------------------------------------------------
    // Delete operation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let h = harness();
        let doc = record("tenant-one", "Widget", 1);
        h.records.insert(doc.clone());
        h.engine
            .index_document(&tenant("tenant-one"), doc.id)
            .await
            .unwrap();

        // A stranger's delete fails and leaves the document in place.
        let err = h
            .engine
            .delete_document(&tenant("tenant-two"), doc.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(h
            .engine
            .get_document(&tenant("tenant-one"), doc.id)
            .await
            .is_ok());

        // The owner's delete succeeds and the document is gone.
        h.engine
            .delete_document(&tenant("tenant-one"), doc.id)
            .await
            .unwrap();
        assert!(h.index.get(doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let h = harness();
        let t = tenant("acme-tenant");
        let doc = record("acme-tenant", "Widget", 1);
        h.records.insert(doc.clone());
        h.engine.index_document(&t, doc.id).await.unwrap();

        // Warm the cache, then delete.
        h.engine.get_document(&t, doc.id).await.unwrap();
        h.engine.delete_document(&t, doc.id).await.unwrap();

        let err = h.engine.get_document(&t, doc.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    // ------------------------------------------------------------------
    // Cache failure policy
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_noop_cache_parity() {
        for cache in [
            Arc::new(NoopCache) as Arc<dyn DocumentCache>,
            Arc::new(MemoryCache::new()) as Arc<dyn DocumentCache>,
        ] {
            let h = harness_with_cache(cache);
            let t = tenant("acme-tenant");
            let doc = record("acme-tenant", "Blue Shirt Large", 1);
            h.records.insert(doc.clone());

            h.engine.index_document(&t, doc.id).await.unwrap();
            let fetched = h.engine.get_document(&t, doc.id).await.unwrap();
            assert_eq!(fetched.name.as_deref(), Some("Blue Shirt Large"));

            let results = h
                .engine
                .search(&SearchRequest::new(t.clone(), "blue"))
                .await
                .unwrap();
            assert_eq!(results.total, 1);

            h.engine.delete_document(&t, doc.id).await.unwrap();
            assert!(h.engine.get_document(&t, doc.id).await.is_err());
        }
    }

    #[tokio::test]
    async fn test_cache_failures_never_fail_operations() {
        let h = harness_with_cache(Arc::new(PoisonedCache));
        let t = tenant("acme-tenant");
        let doc = record("acme-tenant", "Widget", 1);
        h.records.insert(doc.clone());

        h.engine.index_document(&t, doc.id).await.unwrap();
        h.engine.get_document(&t, doc.id).await.unwrap();
        let results = h
            .engine
            .search(&SearchRequest::new(t.clone(), "widget"))
            .await
            .unwrap();
        assert_eq!(results.total, 1);
        h.engine.delete_document(&t, doc.id).await.unwrap();
    }

    // ------------------------------------------------------------------
    // Timeouts
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_stalled_index_times_out() {
        let records = Arc::new(MemoryRecordStore::new());
        let engine = SyncEngine::new(
            records.clone(),
            Arc::new(StalledIndex),
            Arc::new(NoopCache),
            CacheKeys::new("curator:"),
            EngineConfig::new().with_call_timeout(Duration::from_millis(20)),
        );
        let t = tenant("acme-tenant");

        let err = engine
            .search(&SearchRequest::new(t.clone(), "widget"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CuratorError::Timeout {
                kind: StoreKind::Index,
                ..
            }
        ));

        let doc = record("acme-tenant", "Widget", 1);
        records.insert(doc.clone());
        let err = engine.index_document(&t, doc.id).await.unwrap_err();
        assert!(matches!(err, CuratorError::Timeout { .. }));
    }
}
