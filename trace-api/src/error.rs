//! API Error Types
//!
//! Maps domain and storage failures onto HTTP status codes and a JSON
//! error body. Illegal transitions surface as 409, unknown
//! kinds/statuses/roles as 400, wrong actors as 403 — the client
//! disables the action or shows "action unavailable", it never crashes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use trace_core::TraceError;
use trace_store::StoreError;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Validation error
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    /// Unauthorized access
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Forbidden action
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] TraceError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ApiError::Forbidden {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
        }
    }

    fn domain_status(err: &TraceError) -> StatusCode {
        match err {
            TraceError::IllegalTransition { .. }
            | TraceError::ConflictingOwnership { .. }
            | TraceError::CustodyRegression { .. } => StatusCode::CONFLICT,
            TraceError::RoleNotPermitted { .. } => StatusCode::FORBIDDEN,
            TraceError::UnknownTransition { .. }
            | TraceError::UnknownRole { .. }
            | TraceError::UnknownEdge { .. }
            | TraceError::ReconciliationMismatch { .. }
            | TraceError::WeightExceedsParts { .. }
            | TraceError::Validation { .. } => StatusCode::BAD_REQUEST,
            TraceError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Domain(err) => Self::domain_status(err),
            ApiError::Store(err) => match err {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Duplicate { .. } | StoreError::InvalidState { .. } => {
                    StatusCode::CONFLICT
                }
                StoreError::Domain(inner) => Self::domain_status(inner),
                StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
            ApiError::Domain(err) => err.code().unwrap_or("DOMAIN_ERROR"),
            ApiError::Store(err) => match err {
                StoreError::NotFound { .. } => "NOT_FOUND",
                StoreError::Duplicate { .. } => "DUPLICATE",
                StoreError::InvalidState { .. } => "INVALID_STATE",
                StoreError::Domain(inner) => inner.code().unwrap_or("DOMAIN_ERROR"),
                StoreError::Internal(_) => "INTERNAL_ERROR",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_transition_is_conflict() {
        let err = ApiError::Domain(TraceError::IllegalTransition {
            kind: "farm".into(),
            from: "approved".into(),
            to: "pending".into(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "TRC-FLOW-001");
    }

    #[test]
    fn test_unknown_role_is_bad_request() {
        let err = ApiError::Domain(TraceError::unknown_role("auditor"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "TRC-VIEW-001");
    }

    #[test]
    fn test_wrong_actor_is_forbidden() {
        let err = ApiError::Store(StoreError::Domain(TraceError::RoleNotPermitted {
            kind: "farm".into(),
            from: "pending".into(),
            to: "approved".into(),
            role: "farmer".into(),
        }));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = ApiError::Store(StoreError::not_found("Farm", "farm:1"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
