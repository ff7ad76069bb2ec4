//! Elasticsearch-compatible search index adapter.
//!
//! The index is consumed purely through its JSON HTTP API; no client SDK.
//! Writes pass `refresh=wait_for` so a returning upsert or delete is visible
//! to the next query (the engine's read-your-writes requirement). Queries
//! are built as bool queries with the tenant filter as a mandatory clause
//! and an explicit secondary sort on `modified_at`, because the engine must
//! not rely on the index's default tie-break.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use curator_core::{
    CuratorError, CuratorResult, DocumentId, IndexedDocument, SearchHit, SearchRequest,
    SearchResults, StoreKind,
};

use crate::traits::SearchIndex;

/// Search-index connection configuration.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    /// Base URL of the cluster, e.g. `http://localhost:9200`.
    pub url: String,
    /// Index name holding catalog documents.
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Connection-level timeout for every request.
    pub timeout: std::time::Duration,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "curator-documents".to_string(),
            username: None,
            password: None,
            timeout: std::time::Duration::from_secs(10),
        }
    }
}

impl ElasticConfig {
    /// Load configuration from `CURATOR_ES_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("CURATOR_ES_URL").unwrap_or(defaults.url),
            index: std::env::var("CURATOR_ES_INDEX").unwrap_or(defaults.index),
            username: std::env::var("CURATOR_ES_USERNAME").ok(),
            password: std::env::var("CURATOR_ES_PASSWORD").ok(),
            timeout: std::time::Duration::from_secs(
                std::env::var("CURATOR_ES_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// Search index backed by an Elasticsearch-compatible cluster.
#[derive(Clone)]
pub struct ElasticIndex {
    http: reqwest::Client,
    base: String,
    index: String,
    auth: Option<(String, String)>,
}

impl ElasticIndex {
    /// Build the adapter, creating a long-lived HTTP client.
    pub fn from_config(config: &ElasticConfig) -> CuratorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;

        let auth = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        Ok(Self {
            http,
            base: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            auth,
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base, path));
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    /// Create the index with the document mapping if it does not exist.
    ///
    /// `name` and `alias` carry a keyword sub-field for exact-match lookups
    /// alongside analyzed text; `description` is text-only; `tenant_id` and
    /// `status` are exact-match only.
    pub async fn ensure_index(&self) -> CuratorResult<()> {
        let exists = self
            .request(Method::HEAD, &format!("/{}", self.index))
            .send()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;
        if exists.status().is_success() {
            return Ok(());
        }

        let response = self
            .request(Method::PUT, &format!("/{}", self.index))
            .json(&index_mapping())
            .send()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;

        if !response.status().is_success() {
            return Err(CuratorError::store(
                StoreKind::Index,
                format!("index creation failed: {}", response.status()),
            ));
        }
        tracing::info!(index = %self.index, "created search index");
        Ok(())
    }

    async fn json_body(response: reqwest::Response) -> CuratorResult<Value> {
        response
            .json::<Value>()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))
    }
}

/// Index mapping for the projection contract.
fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id":          { "type": "keyword" },
                "tenant_id":   { "type": "keyword" },
                "status":      { "type": "keyword" },
                "name":        { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
                "alias":       { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
                "description": { "type": "text" },
                "created_at":  { "type": "date" },
                "modified_at": { "type": "date" }
            }
        }
    })
}

/// Build the query body for a search request.
///
/// Weighted multi-field match when text is present, match-all otherwise;
/// tenant (and optionally status) equality as filter clauses so they never
/// influence scoring; explicit score-then-recency sort.
fn build_query(req: &SearchRequest) -> Value {
    let must = if req.is_match_all() {
        json!({ "match_all": {} })
    } else {
        json!({
            "multi_match": {
                "query": req.query,
                "fields": ["name^3", "alias^2", "description"]
            }
        })
    };

    let mut filter = vec![json!({ "term": { "tenant_id": req.tenant.as_str() } })];
    if let Some(status) = req.status {
        filter.push(json!({ "term": { "status": status.as_str() } }));
    }

    json!({
        "from": req.offset,
        "size": req.size,
        "track_total_hits": true,
        "query": { "bool": { "must": [must], "filter": filter } },
        "sort": [
            { "_score": { "order": "desc" } },
            { "modified_at": { "order": "desc", "missing": "_last" } }
        ]
    })
}

fn parse_results(body: &Value) -> CuratorResult<SearchResults> {
    let hits_obj = body
        .get("hits")
        .ok_or_else(|| CuratorError::store(StoreKind::Index, "response missing hits"))?;

    let total = hits_obj
        .pointer("/total/value")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let exact = hits_obj
        .pointer("/total/relation")
        .and_then(Value::as_str)
        .map(|relation| relation == "eq")
        .unwrap_or(true);

    let mut hits = Vec::new();
    for hit in hits_obj
        .get("hits")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let source = hit
            .get("_source")
            .ok_or_else(|| CuratorError::store(StoreKind::Index, "hit missing _source"))?;
        let document: IndexedDocument = serde_json::from_value(source.clone())
            .map_err(|e| CuratorError::store(StoreKind::Index, format!("bad hit shape: {}", e)))?;
        let score = hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0);
        hits.push(SearchHit {
            id: document.id,
            score,
            document,
        });
    }

    Ok(SearchResults { total, exact, hits })
}

#[async_trait]
impl SearchIndex for ElasticIndex {
    async fn upsert(&self, doc: &IndexedDocument) -> CuratorResult<()> {
        let path = format!("/{}/_doc/{}?refresh=wait_for", self.index, doc.id);
        let response = self
            .request(Method::PUT, &path)
            .json(doc)
            .send()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;

        if !response.status().is_success() {
            return Err(CuratorError::store(
                StoreKind::Index,
                format!("upsert failed: {}", response.status()),
            ));
        }
        Ok(())
    }

    async fn get(&self, id: DocumentId) -> CuratorResult<Option<IndexedDocument>> {
        let path = format!("/{}/_doc/{}", self.index, id);
        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CuratorError::store(
                StoreKind::Index,
                format!("get failed: {}", response.status()),
            ));
        }

        let body = Self::json_body(response).await?;
        let source = body
            .get("_source")
            .ok_or_else(|| CuratorError::store(StoreKind::Index, "response missing _source"))?;
        let document = serde_json::from_value(source.clone())
            .map_err(|e| CuratorError::store(StoreKind::Index, format!("bad doc shape: {}", e)))?;
        Ok(Some(document))
    }

    async fn delete(&self, id: DocumentId) -> CuratorResult<()> {
        let path = format!("/{}/_doc/{}?refresh=wait_for", self.index, id);
        let response = self
            .request(Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;

        // Deleting an absent id is not an error; the caller already verified
        // ownership, and a concurrent delete is last-writer-wins.
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(CuratorError::store(
                StoreKind::Index,
                format!("delete failed: {}", response.status()),
            ));
        }
        Ok(())
    }

    async fn query(&self, req: &SearchRequest) -> CuratorResult<SearchResults> {
        let path = format!("/{}/_search", self.index);
        let response = self
            .request(Method::POST, &path)
            .json(&build_query(req))
            .send()
            .await
            .map_err(|e| CuratorError::store(StoreKind::Index, e.to_string()))?;

        if !response.status().is_success() {
            return Err(CuratorError::store(
                StoreKind::Index,
                format!("query failed: {}", response.status()),
            ));
        }

        parse_results(&Self::json_body(response).await?)
    }
}
