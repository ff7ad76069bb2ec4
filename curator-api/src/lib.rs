//! Curator API - HTTP Surface
//!
//! Thin Axum layer over the synchronization engine: tenant resolution from
//! the request context, request validation, error-to-status mapping, and the
//! four operations (index, search, get, delete) plus a health probe. All
//! consistency logic lives in `curator-engine`; this crate only translates
//! transport.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod tenant;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;
pub use tenant::{TenantExtractor, TENANT_HEADER};

use axum::Router;

/// Assemble the full API router over the given state.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/documents", routes::documents::create_router())
        .nest("/api/v1/search", routes::search::create_router())
        .nest("/health", routes::health::create_router())
        .with_state(state)
}
