//! Engine configuration.

use std::time::Duration;

/// Tunables for the synchronization engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time-to-live for cache entries. This is the documented maximum
    /// staleness of any cached read; lowering it tightens the consistency
    /// window at the cost of hit rate.
    pub cache_ttl: Duration,
    /// Upper bound on any single store call. A store that stops responding
    /// fails the operation instead of hanging it.
    pub call_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache entry time-to-live.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_cache_ttl(Duration::from_secs(120))
            .with_call_timeout(Duration::from_secs(2));
        assert_eq!(config.cache_ttl, Duration::from_secs(120));
        assert_eq!(config.call_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.call_timeout, Duration::from_secs(5));
    }
}
