//! Adapter traits for the three external stores.
//!
//! Each store is consumed as a black box behind an object-safe trait, so the
//! synchronization engine never depends on a concrete client. Implementations
//! must be cheap to clone behind an `Arc` and safe under concurrent use; all
//! connections are acquired once at startup and shared.

use std::time::Duration;

use async_trait::async_trait;
use curator_core::{
    CatalogDocument, CuratorResult, DocumentId, IndexedDocument, SearchRequest, SearchResults,
    TenantId,
};

/// System-of-record lookup.
///
/// The tenant filter is part of the fetch itself, not applied afterwards: a
/// document owned by another tenant comes back as `None`, indistinguishable
/// from one that does not exist.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch(
        &self,
        id: DocumentId,
        tenant: &TenantId,
    ) -> CuratorResult<Option<CatalogDocument>>;
}

/// Indexed-document store with ranked query capability.
///
/// `upsert` and `delete` are acknowledged writes: when they return, the
/// change is visible to an immediately following `get` or `query`
/// (read-your-writes, not eventual-only). `get` is the index's raw primitive
/// and is *not* tenant-scoped; callers own the tenant check.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Write or overwrite a document under its external id.
    async fn upsert(&self, doc: &IndexedDocument) -> CuratorResult<()>;

    /// Fetch a document by external id, regardless of tenant.
    async fn get(&self, id: DocumentId) -> CuratorResult<Option<IndexedDocument>>;

    /// Remove a document by external id. Deleting an absent id is not an
    /// error.
    async fn delete(&self, id: DocumentId) -> CuratorResult<()>;

    /// Ranked, tenant-filtered query.
    ///
    /// Non-empty query text matches across name (weighted highest), alias
    /// (second) and description (unweighted); empty text matches all.
    /// Ordering is relevance descending, ties broken by modification time
    /// descending, and must be reproducible for identical inputs and index
    /// state.
    async fn query(&self, req: &SearchRequest) -> CuratorResult<SearchResults>;
}

/// Key/value cache with per-entry expiry.
///
/// Values are opaque serialized strings; the engine owns serialization.
/// Every implementation is allowed to fail (the engine treats any cache
/// error as a miss), but the no-op implementation exists so an unconfigured
/// cache is a startup decision, not a per-call branch.
#[async_trait]
pub trait DocumentCache: Send + Sync {
    async fn get(&self, key: &str) -> CuratorResult<Option<String>>;

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> CuratorResult<()>;

    async fn delete(&self, key: &str) -> CuratorResult<()>;
}
