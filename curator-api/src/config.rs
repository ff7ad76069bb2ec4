//! API configuration.
//!
//! Assembles per-store configuration from environment variables. The cache
//! section is optional by design: without `CURATOR_CACHE_NODES` the server
//! runs with the no-op cache and identical behavior, only without the
//! latency benefit.

use std::time::Duration;

use curator_engine::EngineConfig;
use curator_storage::{CacheConfig, ElasticConfig, PgConfig};

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host for the HTTP listener.
    pub host: String,
    /// Bind port for the HTTP listener.
    pub port: u16,
    /// Record-store connection settings.
    pub records: PgConfig,
    /// Search-index connection settings.
    pub index: ElasticConfig,
    /// Cache cluster settings; `None` disables caching transparently.
    pub cache: Option<CacheConfig>,
    /// Engine tunables (derived in part from the cache settings).
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load the full configuration from `CURATOR_*` environment variables.
    pub fn from_env() -> Self {
        let cache = CacheConfig::from_env();

        let call_timeout = Duration::from_secs(
            std::env::var("CURATOR_CALL_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        );

        let mut engine = EngineConfig::new().with_call_timeout(call_timeout);
        if let Some(cache) = &cache {
            engine = engine.with_cache_ttl(cache.ttl);
        }

        Self {
            host: std::env::var("CURATOR_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("CURATOR_API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            records: PgConfig::from_env(),
            index: ElasticConfig::from_env(),
            cache,
            engine,
        }
    }

    /// Namespace prefix for cache keys (empty when caching is disabled).
    pub fn key_prefix(&self) -> &str {
        self.cache
            .as_ref()
            .map(|cache| cache.key_prefix.as_str())
            .unwrap_or("")
    }
}
