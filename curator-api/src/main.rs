//! Curator API server entry point.
//!
//! Bootstraps configuration, connects the three store adapters once, and
//! starts the Axum HTTP server. The cache adapter is selected here: a
//! configured cluster gets the Redis backend, otherwise the no-op cache, so
//! the rest of the process never branches on cache presence.

use std::net::SocketAddr;
use std::sync::Arc;

use curator_api::{create_api_router, ApiError, ApiResult, AppConfig, AppState};
use curator_core::CacheKeys;
use curator_engine::SyncEngine;
use curator_storage::{DocumentCache, ElasticIndex, NoopCache, PgRecordStore, RedisCache};

#[tokio::main]
async fn main() -> ApiResult<()> {
    curator_api::telemetry::init_tracing();

    let config = AppConfig::from_env();

    let records = PgRecordStore::from_config(&config.records)?;

    let index = ElasticIndex::from_config(&config.index)?;
    index.ensure_index().await?;

    let cache: Arc<dyn DocumentCache> = match &config.cache {
        Some(cache_config) => {
            let cache = RedisCache::connect(cache_config).await?;
            tracing::info!(nodes = ?cache_config.nodes, "cache cluster connected");
            Arc::new(cache)
        }
        None => {
            tracing::info!("no cache cluster configured, caching disabled");
            Arc::new(NoopCache)
        }
    };

    let engine = SyncEngine::new(
        Arc::new(records),
        Arc::new(index),
        cache,
        CacheKeys::new(config.key_prefix()),
        config.engine.clone(),
    );

    let app = create_api_router(AppState::new(engine));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            ApiError::new(
                curator_api::ErrorCode::ValidationFailed,
                format!("invalid bind address: {}", e),
            )
        })?;
    tracing::info!(%addr, "starting Curator API server");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ApiError::new(
            curator_api::ErrorCode::InternalError,
            format!("failed to bind {}: {}", addr, e),
        )
    })?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::new(
                curator_api::ErrorCode::InternalError,
                format!("server error: {}", e),
            ))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
