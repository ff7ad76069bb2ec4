//! Error types for Curator operations.

use thiserror::Error;

/// Which external store produced a failure.
///
/// Carried on [`CuratorError::Store`] so the API layer can log the origin
/// without leaking it to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// The system-of-record document store.
    Records,
    /// The search index.
    Index,
    /// The read-through cache.
    Cache,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Records => write!(f, "record store"),
            StoreKind::Index => write!(f, "search index"),
            StoreKind::Cache => write!(f, "cache"),
        }
    }
}

/// Error taxonomy for the synchronization core.
///
/// Three families, mirroring how failures surface to callers:
///
/// - validation (`MissingTenant`, `InvalidId`): rejected immediately, no
///   store was contacted;
/// - `NotFound`: the document is absent *or* belongs to another tenant.
///   The two cases are deliberately indistinguishable so that existence
///   never leaks across tenants;
/// - `Store`: a store on the critical path failed or timed out. The reason
///   is for logs; callers get a generic internal error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CuratorError {
    #[error("tenant identifier is missing or empty")]
    MissingTenant,

    #[error("invalid document identifier: {value}")]
    InvalidId { value: String },

    #[error("document not found: {id}")]
    NotFound { id: String },

    #[error("{kind} failure: {reason}")]
    Store { kind: StoreKind, reason: String },

    #[error("{kind} call timed out after {millis}ms")]
    Timeout { kind: StoreKind, millis: u64 },
}

impl CuratorError {
    /// Build a store failure for the given store.
    pub fn store(kind: StoreKind, reason: impl Into<String>) -> Self {
        CuratorError::Store {
            kind,
            reason: reason.into(),
        }
    }

    /// Build a not-found error for an identifier.
    ///
    /// Used both for genuinely absent documents and for tenant mismatches.
    pub fn not_found(id: impl ToString) -> Self {
        CuratorError::NotFound { id: id.to_string() }
    }

    /// True for errors caused by malformed input rather than store state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CuratorError::MissingTenant | CuratorError::InvalidId { .. }
        )
    }

    /// True for not-found errors (absent document or wrong tenant).
    pub fn is_not_found(&self) -> bool {
        matches!(self, CuratorError::NotFound { .. })
    }
}

/// Result alias used throughout the workspace.
pub type CuratorResult<T> = Result<T, CuratorError>;
