//! API error types.
//!
//! This module provides error types for the API layer including:
//! - Authentication errors
//! - Validation errors
//! - Mapping of simulation and account errors onto HTTP statuses

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use scpi_core::error::SimulationError;
use scpi_security::SecurityError;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Bad request / validation error
    #[error("{0}")]
    BadRequest(String),

    /// Conflict (e.g., duplicate resource)
    #[error("{0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code string.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message sent to the client. Internal details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Builds the response body, tagged with `request_id` when known.
    #[must_use]
    pub fn to_body(&self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            status: "error",
            code: self.error_code(),
            error: self.public_message(),
            request_id,
        }
    }

    fn log(&self) {
        if let Self::Internal(detail) = self {
            error!(detail = %detail, "Request failed");
        }
    }
}

/// Error response body.
///
/// A copy rides along in the response extensions so the request id layer
/// can stamp the id into the body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `"error"`
    pub status: &'static str,
    /// Error code
    pub code: &'static str,
    /// Human readable message
    pub error: String,
    /// Request ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = self.to_body(None);
        let mut response = (self.status_code(), Json(&body)).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::InvalidInput { .. } => Self::BadRequest(err.to_string()),
            SimulationError::ProductNotFound { .. } => Self::NotFound(err.to_string()),
            SimulationError::Catalog(source) => Self::Internal(source.to_string()),
        }
    }
}

impl From<SecurityError> for ApiError {
    fn from(err: SecurityError) -> Self {
        match err {
            SecurityError::MissingField { .. } | SecurityError::InvalidEmail { .. } => {
                Self::BadRequest(err.to_string())
            }
            SecurityError::EmailTaken => Self::Conflict(err.to_string()),
            SecurityError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            SecurityError::SessionExpired | SecurityError::InvalidToken { .. } => {
                Self::Unauthorized(format!("Invalid authentication: {err}"))
            }
            SecurityError::UserNotFound { .. } => {
                Self::Unauthorized("Invalid authentication: unknown user".to_string())
            }
            SecurityError::PasswordHash { .. } | SecurityError::ConfigurationError { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
