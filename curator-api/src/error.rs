//! Error types for the Curator API.
//!
//! Maps the core error taxonomy onto structured JSON responses with
//! appropriate HTTP status codes. Store-level causes are logged here and
//! replaced with generic messages; they never reach the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use curator_core::CuratorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request validation failed
    ValidationFailed,

    /// Tenant header is missing or empty
    MissingTenant,

    /// Document identifier is malformed
    InvalidIdentifier,

    /// Document does not exist (or is not visible to this tenant)
    DocumentNotFound,

    /// Internal server error
    InternalError,

    /// A backing store did not answer in time
    Timeout,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::MissingTenant
            | ErrorCode::InvalidIdentifier => StatusCode::BAD_REQUEST,

            ErrorCode::DocumentNotFound => StatusCode::NOT_FOUND,

            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::MissingTenant => "Tenant identifier is required",
            ErrorCode::InvalidIdentifier => "Invalid document identifier",
            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::Timeout => "Operation timed out",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the default message for the code.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<CuratorError> for ApiError {
    fn from(err: CuratorError) -> Self {
        match err {
            CuratorError::MissingTenant => ApiError::from_code(ErrorCode::MissingTenant),
            CuratorError::InvalidId { value } => ApiError::new(
                ErrorCode::InvalidIdentifier,
                format!("Invalid document identifier: {}", value),
            ),
            CuratorError::NotFound { .. } => ApiError::from_code(ErrorCode::DocumentNotFound),
            CuratorError::Store { .. } => {
                // The cause goes to the log, not to the caller.
                tracing::error!(error = %err, "store failure");
                ApiError::from_code(ErrorCode::InternalError)
            }
            CuratorError::Timeout { .. } => {
                tracing::error!(error = %err, "store timeout");
                ApiError::from_code(ErrorCode::Timeout)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::StoreKind;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ErrorCode::MissingTenant.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidIdentifier.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DocumentNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ErrorCode::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_core_error_conversion() {
        let api: ApiError = CuratorError::MissingTenant.into();
        assert_eq!(api.code, ErrorCode::MissingTenant);

        let api: ApiError = CuratorError::not_found("x").into();
        assert_eq!(api.code, ErrorCode::DocumentNotFound);

        let api: ApiError = CuratorError::InvalidId {
            value: "bogus".to_string(),
        }
        .into();
        assert_eq!(api.code, ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_store_cause_not_leaked() {
        let api: ApiError =
            CuratorError::store(StoreKind::Index, "secret-host:9200 refused").into();
        assert_eq!(api.code, ErrorCode::InternalError);
        assert!(!api.message.contains("secret-host"));
    }
}
