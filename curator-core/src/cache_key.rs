//! Deterministic cache-key derivation.
//!
//! Two key families exist, colon-delimited and namespaced by a configurable
//! prefix:
//!
//! - single document: `<prefix>doc:<tenant>:<id>`
//! - search results:  `<prefix>search:<tenant>:<offset>:<size>:<statusOrEmpty>:<query>`
//!
//! The search key encodes every request parameter in a fixed order, so
//! identical requests always collide on the same entry and requests that
//! differ in any parameter never do. The raw query text is the final
//! segment, so it may itself contain colons without ambiguity.

use crate::document::{DocumentId, TenantId};
use crate::query::SearchRequest;

/// Cache-key builder carrying the configured namespace prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeys {
    prefix: String,
}

impl CacheKeys {
    /// Create a builder with the given namespace prefix.
    ///
    /// The prefix is prepended verbatim; pass e.g. `"curator:"` to namespace
    /// keys when sharing a cache cluster with other applications.
    pub fn new(prefix: impl Into<String>) -> Self {
        CacheKeys {
            prefix: prefix.into(),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key for a single cached document.
    pub fn document(&self, tenant: &TenantId, id: DocumentId) -> String {
        format!("{}doc:{}:{}", self.prefix, tenant, id)
    }

    /// Key for a cached search result page.
    pub fn search(&self, req: &SearchRequest) -> String {
        let status = req.status.map(|s| s.as_str()).unwrap_or("");
        format!(
            "{}search:{}:{}:{}:{}:{}",
            self.prefix, req.tenant, req.offset, req.size, status, req.query
        )
    }
}
