//! Search request and result types.

use serde::{Deserialize, Serialize};

use crate::document::{DocStatus, DocumentId, IndexedDocument, TenantId};

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard upper bound on page size, protecting the index from deep fetches.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A tenant-scoped search request.
///
/// An empty query string means match-all. The tenant filter is not optional:
/// there is no way to construct a request that spans tenants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub tenant: TenantId,
    /// Free-text query; empty means match-all.
    pub query: String,
    pub offset: u64,
    pub size: u64,
    /// Optional status override filter.
    pub status: Option<DocStatus>,
}

impl SearchRequest {
    /// Create a request with default pagination and no status filter.
    pub fn new(tenant: TenantId, query: impl Into<String>) -> Self {
        SearchRequest {
            tenant,
            query: query.into(),
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
            status: None,
        }
    }

    /// Set the pagination offset.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Restrict results to a single status.
    pub fn with_status(mut self, status: DocStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether this request has match-all semantics.
    pub fn is_match_all(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// A single ranked result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    /// Relevance score assigned by the index. Match-all queries score 0.
    pub score: f64,
    pub document: IndexedDocument,
}

/// An ordered page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total number of matching documents across all pages.
    pub total: u64,
    /// Whether `total` is exact or a lower bound reported by the index.
    pub exact: bool,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    /// An empty result set with an exact zero total.
    pub fn empty() -> Self {
        SearchResults {
            total: 0,
            exact: true,
            hits: Vec::new(),
        }
    }
}
