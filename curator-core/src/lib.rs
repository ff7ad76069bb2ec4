//! Curator Core - Data Model
//!
//! Pure data types for the catalog search synchronizer: the record-store and
//! indexed document shapes, the deterministic projection between them, search
//! request/result types, cache-key derivation, and the shared error taxonomy.
//! All other crates depend on this one; it contains no I/O.

pub mod cache_key;
pub mod document;
pub mod error;
pub mod query;

pub use cache_key::CacheKeys;
pub use document::{
    CatalogDocument, DocStatus, DocumentId, IndexedDocument, TenantId,
};
pub use error::{CuratorError, CuratorResult, StoreKind};
pub use query::{
    SearchHit, SearchRequest, SearchResults, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
