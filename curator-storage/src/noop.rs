//! Null-object cache for deployments without a cache cluster.

use std::time::Duration;

use async_trait::async_trait;
use curator_core::CuratorResult;

use crate::traits::DocumentCache;

/// A cache that stores nothing.
///
/// Selected at startup when no cache cluster is configured, so every read is
/// a miss and every write succeeds without effect. Call sites never branch on
/// cache presence; the operations behave identically either way, only without
/// the latency benefit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl DocumentCache for NoopCache {
    async fn get(&self, _key: &str) -> CuratorResult<Option<String>> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> CuratorResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CuratorResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_cache_always_misses() {
        let cache = NoopCache;
        cache
            .put("doc:t:1", "value", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("doc:t:1").await.unwrap(), None);
        cache.delete("doc:t:1").await.unwrap();
    }
}
