//! Curator Engine - Synchronization Core
//!
//! Keeps a tenant-partitioned search index synchronized with the system of
//! record and fronts both with a short-lived read-through cache. There is no
//! transaction spanning the stores; consistency is invalidate-after-write
//! with a bounded staleness window (the cache TTL), and the record store
//! remains the single source of truth.
//!
//! Concurrency model: operations never coordinate with each other. Races on
//! the index or the cache resolve last-writer-wins, which is harmless because
//! both are rebuildable secondary structures. Tenant isolation comes from
//! filter predicates, not separate execution contexts.

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::SyncEngine;
