//! Search REST route.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use curator_core::{DocStatus, SearchRequest, SearchResults};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::tenant::TenantExtractor;

/// Query-string parameters for search.
///
/// All optional: an absent `q` means match-all, pagination falls back to the
/// engine defaults (offset 0, size 10).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub offset: Option<u64>,
    pub size: Option<u64>,
    pub status: Option<DocStatus>,
}

/// GET /api/v1/search - tenant-scoped ranked search.
pub async fn search(
    State(state): State<AppState>,
    TenantExtractor(tenant): TenantExtractor,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResults>> {
    let mut req = SearchRequest::new(tenant, params.q.unwrap_or_default());
    if let Some(offset) = params.offset {
        req = req.with_offset(offset);
    }
    if let Some(size) = params.size {
        req = req.with_size(size);
    }
    if let Some(status) = params.status {
        req = req.with_status(status);
    }

    Ok(Json(state.engine.search(&req).await?))
}

/// Create the search routes router.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(search))
}
