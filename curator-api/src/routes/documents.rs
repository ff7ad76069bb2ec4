//! Document REST routes: index, fetch, delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use curator_core::{DocumentId, IndexedDocument};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::tenant::TenantExtractor;

/// Acknowledgement returned by the index operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAck {
    pub id: DocumentId,
}

/// POST /api/v1/documents/:id/index - project and index a record.
pub async fn index_document(
    State(state): State<AppState>,
    TenantExtractor(tenant): TenantExtractor,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = DocumentId::parse(&id)?;
    let id = state.engine.index_document(&tenant, id).await?;
    Ok(Json(IndexAck { id }))
}

/// GET /api/v1/documents/:id - fetch a single indexed document.
pub async fn get_document(
    State(state): State<AppState>,
    TenantExtractor(tenant): TenantExtractor,
    Path(id): Path<String>,
) -> ApiResult<Json<IndexedDocument>> {
    let id = DocumentId::parse(&id)?;
    let doc = state.engine.get_document(&tenant, id).await?;
    Ok(Json(doc))
}

/// DELETE /api/v1/documents/:id - remove a document from the index.
pub async fn delete_document(
    State(state): State<AppState>,
    TenantExtractor(tenant): TenantExtractor,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = DocumentId::parse(&id)?;
    state.engine.delete_document(&tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create the document routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/:id/index", post(index_document))
        .route("/:id", get(get_document).delete(delete_document))
}
