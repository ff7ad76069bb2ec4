//! Tenant resolution from the request context.
//!
//! Every operation is scoped to exactly one tenant, carried in the
//! `x-tenant-id` header. The value is trusted as supplied (authenticating it
//! is out of scope); the extractor only guarantees presence and
//! non-emptiness. A missing tenant is a request-validation failure and the
//! engine is never invoked.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use curator_core::TenantId;

use crate::error::{ApiError, ErrorCode};

/// Header carrying the tenant identifier.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Extractor providing the validated tenant for a request.
///
/// # Example
///
/// ```ignore
/// async fn handler(TenantExtractor(tenant): TenantExtractor) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct TenantExtractor(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for TenantExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        TenantId::new(value)
            .map(TenantExtractor)
            .map_err(|_| ApiError::from_code(ErrorCode::MissingTenant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<TenantExtractor, ApiError> {
        let (mut parts, _) = request.into_parts();
        TenantExtractor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_tenant_header() {
        let request = Request::builder()
            .header(TENANT_HEADER, "acme-tenant")
            .body(())
            .unwrap();
        let TenantExtractor(tenant) = extract(request).await.unwrap();
        assert_eq!(tenant.as_str(), "acme-tenant");
    }

    #[tokio::test]
    async fn test_missing_header_is_validation_error() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingTenant);
    }

    #[tokio::test]
    async fn test_empty_header_is_validation_error() {
        let request = Request::builder()
            .header(TENANT_HEADER, "   ")
            .body(())
            .unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingTenant);
    }
}
