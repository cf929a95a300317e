//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schedule_store::StoreError;
use serde_json::json;

use crate::services::TimeError;

/// Machine-readable error codes carried in error payloads.
pub mod error_codes {
    pub const MALFORMED_PAYLOAD: &str = "MALFORMED_PAYLOAD";
    pub const INVALID_TIME_FORMAT: &str = "INVALID_TIME_FORMAT";
    pub const INVALID_INTERVAL: &str = "INVALID_INTERVAL";
    pub const INVALID_REFERENCE: &str = "INVALID_REFERENCE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
}

/// Server error type.
///
/// Every request failure is one of these kinds, and each kind maps to exactly
/// one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request body or path could not be decoded.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A time value could not be read as a wall-clock time in the
    /// configured zone.
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// A task would end before it starts.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A task refers to an event that does not exist.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The addressed entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store could not execute the request.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl ServerError {
    /// Creates a not found error for the given entity and key.
    pub fn not_found(entity_type: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity_type} {key} not found"))
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_)
            | Self::InvalidTimeFormat(_)
            | Self::InvalidInterval(_)
            | Self::InvalidReference(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ConstraintViolation(_) => StatusCode::CONFLICT,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => error_codes::MALFORMED_PAYLOAD,
            Self::InvalidTimeFormat(_) => error_codes::INVALID_TIME_FORMAT,
            Self::InvalidInterval(_) => error_codes::INVALID_INTERVAL,
            Self::InvalidReference(_) => error_codes::INVALID_REFERENCE,
            Self::NotFound(_) => error_codes::NOT_FOUND,
            Self::ConstraintViolation(_) => error_codes::CONSTRAINT_VIOLATION,
            Self::StoreUnavailable(_) => error_codes::STORE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation { .. } => Self::ConstraintViolation(err.to_string()),
            StoreError::Unavailable(_) => Self::StoreUnavailable(err),
        }
    }
}

impl From<TimeError> for ServerError {
    fn from(err: TimeError) -> Self {
        Self::InvalidTimeFormat(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::StoreUnavailable(err) => {
                tracing::error!(error = %err, "Store unavailable");
                "The store could not process the request".to_string()
            }
            Self::MalformedPayload(msg)
            | Self::InvalidTimeFormat(msg)
            | Self::InvalidInterval(msg)
            | Self::InvalidReference(msg)
            | Self::NotFound(msg)
            | Self::ConstraintViolation(msg) => msg.clone(),
        };

        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_one_status() {
        let cases = [
            (ServerError::MalformedPayload("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::InvalidTimeFormat("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::InvalidInterval("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::InvalidReference("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::not_found("Task", 1), StatusCode::NOT_FOUND),
            (ServerError::ConstraintViolation("x".into()), StatusCode::CONFLICT),
            (
                ServerError::StoreUnavailable(StoreError::Unavailable(sqlx_pool_timeout())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn test_store_errors_are_classified() {
        let err = ServerError::from(StoreError::constraint("User", "duplicate username"));
        assert_eq!(err.code(), error_codes::CONSTRAINT_VIOLATION);

        let err = ServerError::from(StoreError::Unavailable(sqlx_pool_timeout()));
        assert_eq!(err.code(), error_codes::STORE_UNAVAILABLE);
    }

    fn sqlx_pool_timeout() -> schedule_store::SqlxError {
        schedule_store::SqlxError::PoolTimedOut
    }
}
