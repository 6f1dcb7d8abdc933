//! API response types
//!
//! Every QuickStay endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "message": "Listing retrieved successfully", "data": { } }
//! ```
//!
//! Failures set `success` to `false` and carry either `{}` or the list of
//! field violations in `data`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success envelope
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Render with an explicit status code
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }

    /// Render as `201 Created`
    pub fn created(self) -> Response {
        self.with_status(StatusCode::CREATED)
    }
}

impl ApiResponse<serde_json::Value> {
    /// Create a failure envelope
    pub fn failure(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success("ok", json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "message": "ok", "data": {"id": 1}}));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::failure("nope", json!({}))).unwrap();
        assert_eq!(body, json!({"success": false, "message": "nope", "data": {}}));
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::success("made", json!({})).created();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
