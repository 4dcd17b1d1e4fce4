//! API response types.
//!
//! Account endpoints answer with `{"success": true, ...}` where the payload
//! fields sit next to the flag. Simulation and catalog endpoints return
//! their payload as is.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// `{"success": true, ...data}` with HTTP 200.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T>
where
    T: Serialize,
{
    /// Always true
    pub success: bool,
    /// Payload fields, flattened into the body
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Wraps `data`.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for SuccessResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `{"success": true}` for operations that return nothing else.
#[derive(Debug, Serialize)]
pub struct EmptyResponse {
    /// Always true
    pub success: bool,
}

impl EmptyResponse {
    /// Creates an empty success response.
    #[must_use]
    pub fn success() -> Self {
        Self { success: true }
    }
}

impl IntoResponse for EmptyResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Created response (HTTP 201).
#[derive(Debug, Serialize)]
pub struct CreatedResponse<T>
where
    T: Serialize,
{
    /// Always true
    pub success: bool,
    /// Created resource fields, flattened into the body
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> CreatedResponse<T> {
    /// Creates a new created response.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for CreatedResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Registered {
        #[serde(rename = "userId")]
        user_id: u64,
    }

    #[test]
    fn test_success_fields_are_flattened() {
        let json = serde_json::to_value(SuccessResponse::new(Registered { user_id: 4 })).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "userId": 4}));
    }

    #[test]
    fn test_created_status() {
        let response = CreatedResponse::new(Registered { user_id: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_empty_response() {
        let json = serde_json::to_value(EmptyResponse::success()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }
}
