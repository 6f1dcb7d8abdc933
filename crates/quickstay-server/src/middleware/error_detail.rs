//! Outside production, replace the generic 500 message with the real cause.

use axum::response::Response;
use serde_json::json;

use crate::api::response::ApiResponse;
use crate::error::ErrorDetail;

/// `map_response` hook; responses without an [`ErrorDetail`] pass untouched.
pub async fn expose_error_detail(mut response: Response) -> Response {
    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };

    let status = response.status();
    ApiResponse::failure(detail, json!({})).with_status(status)
}
