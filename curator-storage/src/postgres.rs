//! PostgreSQL record-store adapter.
//!
//! The record store is the system of record; this adapter only ever reads
//! from it. A single lookup query carries the tenant predicate, so ownership
//! filtering happens inside the store rather than on the fetched row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row};

use curator_core::{
    CatalogDocument, CuratorError, CuratorResult, DocStatus, DocumentId, StoreKind, TenantId,
};

use crate::traits::RecordStore;

/// Record-store connection configuration.
#[derive(Debug, Clone)]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Table holding catalog documents.
    pub table: String,
    pub max_size: usize,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "curator".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            table: "catalog_documents".to_string(),
            max_size: 16,
        }
    }
}

impl PgConfig {
    /// Load configuration from `CURATOR_DB_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("CURATOR_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("CURATOR_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("CURATOR_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("CURATOR_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("CURATOR_DB_PASSWORD").unwrap_or_default(),
            table: std::env::var("CURATOR_DB_TABLE").unwrap_or(defaults.table),
            max_size: std::env::var("CURATOR_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> CuratorResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(self.max_size));

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| CuratorError::store(StoreKind::Records, format!("pool: {}", e)))
    }
}

/// Record store backed by PostgreSQL.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: Pool,
    fetch_sql: String,
}

impl PgRecordStore {
    /// Create a store over an existing pool.
    pub fn new(pool: Pool, table: &str) -> Self {
        let fetch_sql = format!(
            "SELECT document_id, tenant_id, name, description, alias, status, \
             created_at, modified_at FROM {} WHERE document_id = $1 AND tenant_id = $2",
            table
        );
        Self { pool, fetch_sql }
    }

    /// Create a store from configuration, building its own pool.
    pub fn from_config(config: &PgConfig) -> CuratorResult<Self> {
        Ok(Self::new(config.create_pool()?, &config.table))
    }

    fn row_to_document(row: &Row) -> CuratorResult<CatalogDocument> {
        let tenant: String = row.get("tenant_id");
        let status: Option<String> = row.get("status");
        let status = status.as_deref().map(parse_status).transpose()?;

        Ok(CatalogDocument {
            id: DocumentId::from_uuid(row.get("document_id")),
            tenant_id: TenantId::new(tenant)
                .map_err(|_| CuratorError::store(StoreKind::Records, "empty tenant_id on row"))?,
            name: row.get("name"),
            description: row.get("description"),
            alias: row.get("alias"),
            status,
            created_at: row.get::<_, Option<DateTime<Utc>>>("created_at"),
            modified_at: row.get::<_, Option<DateTime<Utc>>>("modified_at"),
        })
    }
}

fn parse_status(value: &str) -> CuratorResult<DocStatus> {
    match value {
        "draft" => Ok(DocStatus::Draft),
        "published" => Ok(DocStatus::Published),
        "unpublished" => Ok(DocStatus::Unpublished),
        other => Err(CuratorError::store(
            StoreKind::Records,
            format!("unexpected status value: {}", other),
        )),
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch(
        &self,
        id: DocumentId,
        tenant: &TenantId,
    ) -> CuratorResult<Option<CatalogDocument>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Records, e.to_string()))?;

        let row = client
            .query_opt(&self.fetch_sql, &[&id.as_uuid(), &tenant.as_str()])
            .await
            .map_err(|e| CuratorError::store(StoreKind::Records, e.to_string()))?;

        row.as_ref().map(Self::row_to_document).transpose()
    }
}
