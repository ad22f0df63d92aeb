//! API error type and its JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error body sent to clients
///
/// Only a generic message crosses the wire; the detail goes to the logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
        }
    }

    /// Build an error with the status matching a domain failure and a
    /// caller-chosen message
    pub fn from_domain(err: &DomainError, message: impl Into<String>) -> Self {
        Self::new(status_for(err), message)
    }
}

/// HTTP status for a domain failure
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation { .. } | DomainError::InvalidId { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        DomainError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.response.error)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&DomainError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&DomainError::invalid_id("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&DomainError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&DomainError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&DomainError::storage("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_domain_keeps_message() {
        let err = ApiError::from_domain(
            &DomainError::not_found("no row found to delete"),
            "Delete record error (see logs for more info)",
        );

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.error, "Delete record error (see logs for more info)");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::new(
            StatusCode::BAD_REQUEST,
            "Read record error (see logs for more info)",
        );
        let json = serde_json::to_string(&err.response).unwrap();

        assert_eq!(json, r#"{"error":"Read record error (see logs for more info)"}"#);
    }
}
