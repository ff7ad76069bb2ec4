//! Curator Storage - Store Adapters
//!
//! Object-safe adapter traits for the three external stores (record store,
//! search index, cache), plus the concrete backends: PostgreSQL for records,
//! an Elasticsearch-compatible cluster for search, Redis for the cache, a
//! no-op cache for unconfigured deployments, and in-memory backends for
//! tests and local development.

pub mod elastic;
pub mod memory;
pub mod noop;
pub mod postgres;
pub mod redis_cache;
pub mod traits;

pub use elastic::{ElasticConfig, ElasticIndex};
pub use memory::{MemoryCache, MemoryIndex, MemoryRecordStore};
pub use noop::NoopCache;
pub use postgres::{PgConfig, PgRecordStore};
pub use redis_cache::{CacheConfig, RedisCache};
pub use traits::{DocumentCache, RecordStore, SearchIndex};
