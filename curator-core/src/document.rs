//! Catalog document model and search projection.
//!
//! Two shapes exist for every document:
//!
//! - [`CatalogDocument`]: the system-of-record shape, owned and mutated by
//!   the external record store. Curator only ever reads it.
//! - [`IndexedDocument`]: the projection stored in the search index and the
//!   cache. Every projected field is present in the serialized form; a field
//!   the source record lacks serializes as an explicit `null` so the index
//!   schema never drifts per document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CuratorError, CuratorResult};

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Opaque, store-assigned document identifier.
///
/// The stringified form is the single identifier used everywhere outside the
/// record store: as the search index's external id and inside cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        DocumentId(id)
    }

    /// Parse an identifier from its string form.
    ///
    /// Fails with [`CuratorError::InvalidId`], which the API surface maps to
    /// a validation error rather than a not-found.
    pub fn parse(value: &str) -> CuratorResult<Self> {
        Uuid::parse_str(value.trim())
            .map(DocumentId)
            .map_err(|_| CuratorError::InvalidId {
                value: value.to_string(),
            })
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated tenant identifier.
///
/// The value itself is trusted as supplied by the transport layer; the only
/// validation is non-emptiness. Construction is the single place that check
/// happens, so an empty tenant can never reach a store call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Create a tenant id, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> CuratorResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CuratorError::MissingTenant);
        }
        Ok(TenantId(value))
    }

    /// The raw tenant string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = CuratorError;

    fn try_from(value: String) -> CuratorResult<Self> {
        TenantId::new(value)
    }
}

impl From<TenantId> for String {
    fn from(tenant: TenantId) -> String {
        tenant.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// DOCUMENT SHAPES
// ============================================================================

/// Publication status of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Draft,
    Published,
    Unpublished,
}

impl DocStatus {
    /// The lowercase wire form, also used inside cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Draft => "draft",
            DocStatus::Published => "published",
            DocStatus::Unpublished => "unpublished",
        }
    }
}

impl std::fmt::Display for DocStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System-of-record document shape.
///
/// Created and mutated only by the record store's owner; Curator observes it
/// through explicit index requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub alias: Option<String>,
    pub status: Option<DocStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Search/cache projection of a [`CatalogDocument`].
///
/// Field set is the fixed projection contract: `name, description, alias,
/// tenant_id, status, created_at, modified_at`. None of the optional fields
/// carry `skip_serializing_if`: an absent source value serializes as `null`
/// on purpose, keeping the index schema stable across partial records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub alias: Option<String>,
    pub status: Option<DocStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl IndexedDocument {
    /// Project a record-store document into its indexed shape.
    ///
    /// The projection is deterministic and total: every source field maps to
    /// exactly one target field, and the tenant always carries over, which is
    /// what keeps cross-tenant documents out of tenant-scoped results.
    pub fn project(source: &CatalogDocument) -> Self {
        IndexedDocument {
            id: source.id,
            tenant_id: source.tenant_id.clone(),
            name: source.name.clone(),
            description: source.description.clone(),
            alias: source.alias.clone(),
            status: source.status,
            created_at: source.created_at,
            modified_at: source.modified_at,
        }
    }
}
