//! Server-wide error taxonomy
//!
//! Feature slices keep their own `thiserror` enums per operation and fold them
//! into [`AppError`] at the HTTP boundary. `AppError` owns the status mapping,
//! the envelope shape and the single log event emitted per failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::response::ApiResponse;
use crate::features::shared::validation::FieldViolation;

/// Message returned for server-side failures when details are withheld.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UploadRejected(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Storage or persistence failure. The payload is the internal detail.
    #[error("{0}")]
    Internal(String),
}

/// Internal failure detail attached to a response as an extension.
///
/// The body always carries [`GENERIC_ERROR_MESSAGE`]; the error-detail
/// middleware swaps the detail in outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UploadRejected(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let data = match &self {
            AppError::Validation(violations) => json!(violations),
            _ => json!({}),
        };

        let mut response =
            ApiResponse::failure(self.public_message(), data).with_status(status);

        if let AppError::Internal(detail) = self {
            response.extensions_mut().insert(ErrorDetail(detail));
        }

        response
    }
}
