use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::storage::SharedObjectStore;

use super::{
    commands::{IncomingImage, UploadImagesCommand, UploadImagesError},
    policy::{UploadPolicy, IMAGES_FIELD},
};

#[derive(Clone)]
pub struct UploadsState {
    pub store: SharedObjectStore,
    pub policy: UploadPolicy,
}

pub fn uploads_routes(policy: UploadPolicy) -> Router<UploadsState> {
    Router::new()
        .route("/images", post(upload_images))
        .route("/images/public", post(upload_images))
        .layer(DefaultBodyLimit::max(policy.body_limit()))
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_images(
    State(state): State<UploadsState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, UploadApiError> {
    let mut multipart =
        multipart.map_err(|rejection| UploadApiError::Malformed(rejection.body_text()))?;
    let policy = state.policy;
    let mut images = Vec::new();

    while let Some(mut field) = multipart.next_field().await? {
        // Plain form values are ignored
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != IMAGES_FIELD {
            return Err(UploadApiError::Malformed(format!(
                "Unexpected field '{}'. Use field name '{}'.",
                field_name, IMAGES_FIELD
            )));
        }

        if images.len() >= policy.max_files {
            return Err(UploadImagesError::TooManyFiles {
                max: policy.max_files,
            }
            .into());
        }

        let content_type = field.content_type().map(str::to_string);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if bytes.len() + chunk.len() > policy.max_file_bytes {
                return Err(UploadImagesError::FileTooLarge {
                    file_name,
                    max_bytes: policy.max_file_bytes,
                }
                .into());
            }
            bytes.extend_from_slice(&chunk);
        }

        images.push(IncomingImage {
            file_name,
            content_type,
            bytes,
        });
    }

    let response = super::commands::upload_images::handle(
        state.store.as_ref(),
        &policy,
        UploadImagesCommand { images },
    )
    .await?;

    tracing::info!(count = response.count, "Images uploaded via API");

    Ok(ApiResponse::success("Images uploaded successfully", response).created())
}

#[derive(Debug)]
enum UploadApiError {
    Malformed(String),
    TooLarge(String),
    Upload(UploadImagesError),
}

impl From<UploadImagesError> for UploadApiError {
    fn from(err: UploadImagesError) -> Self {
        Self::Upload(err)
    }
}

impl From<MultipartError> for UploadApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge(err.body_text())
        } else {
            Self::Malformed(err.body_text())
        }
    }
}

impl From<UploadApiError> for AppError {
    fn from(err: UploadApiError) -> Self {
        match err {
            UploadApiError::Malformed(message) => AppError::UploadRejected(message),
            UploadApiError::TooLarge(message) => AppError::PayloadTooLarge(message),
            UploadApiError::Upload(UploadImagesError::Storage(e)) => {
                AppError::Internal(format!("Failed to upload images: {:#}", e))
            },
            UploadApiError::Upload(other) => AppError::UploadRejected(other.to_string()),
        }
    }
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
