//! Upload a batch of images to object storage
//!
//! All files are checked against the [`UploadPolicy`] before anything is
//! written. Puts then run concurrently; if any fails, the objects that did
//! land are deleted again and the whole batch fails.

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::uploads::policy::{extension_of, object_key, UploadPolicy};
use crate::storage::ObjectStore;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// One file taken from the multipart body
#[derive(Debug, Clone)]
pub struct IncomingImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingImage {
    /// Declared content type, else one implied by the extension
    pub fn resolved_content_type(&self) -> String {
        if let Some(declared) = self
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
        {
            return declared.to_string();
        }

        match extension_of(&self.file_name).as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => FALLBACK_CONTENT_TYPE,
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadImagesCommand {
    pub images: Vec<IncomingImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadImagesResponse {
    pub images: Vec<UploadedImage>,
    pub count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadImagesError {
    #[error("No images provided. Use field name 'images'.")]
    NoImages,
    #[error("Too many files. At most {max} images per request")]
    TooManyFiles { max: usize },
    #[error("Only image files are allowed: {file_name}")]
    NotAnImage { file_name: String },
    #[error("File too large: {file_name} exceeds {max_bytes} bytes")]
    FileTooLarge { file_name: String, max_bytes: usize },
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl UploadImagesCommand {
    pub fn validate(&self, policy: &UploadPolicy) -> Result<(), UploadImagesError> {
        if self.images.is_empty() {
            return Err(UploadImagesError::NoImages);
        }
        if self.images.len() > policy.max_files {
            return Err(UploadImagesError::TooManyFiles {
                max: policy.max_files,
            });
        }

        for image in &self.images {
            let content_type = image.content_type.as_deref().unwrap_or_default();
            if !policy.is_image(&image.file_name, content_type) {
                return Err(UploadImagesError::NotAnImage {
                    file_name: image.file_name.clone(),
                });
            }
            if image.bytes.len() > policy.max_file_bytes {
                return Err(UploadImagesError::FileTooLarge {
                    file_name: image.file_name.clone(),
                    max_bytes: policy.max_file_bytes,
                });
            }
        }

        Ok(())
    }
}

#[tracing::instrument(skip(store, command), fields(files = command.images.len()))]
pub async fn handle(
    store: &dyn ObjectStore,
    policy: &UploadPolicy,
    command: UploadImagesCommand,
) -> Result<UploadImagesResponse, UploadImagesError> {
    command.validate(policy)?;

    let now = Utc::now();
    let uploads = command.images.into_iter().map(|image| {
        let key = object_key(now, Uuid::new_v4(), &image.file_name);
        let content_type = image.resolved_content_type();
        let size = image.bytes.len();
        async move {
            let result = store.put_public(&key, image.bytes, &content_type).await;
            (key, content_type, size, result)
        }
    });

    let mut uploaded = Vec::new();
    let mut failure = None;
    for (key, content_type, size, result) in join_all(uploads).await {
        match result {
            Ok(url) => uploaded.push(UploadedImage {
                key,
                url,
                content_type,
                size,
            }),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Image upload failed");
                failure.get_or_insert(e);
            },
        }
    }

    if let Some(err) = failure {
        compensate(store, &uploaded).await;
        return Err(UploadImagesError::Storage(err));
    }

    tracing::info!(count = uploaded.len(), "Images uploaded");

    Ok(UploadImagesResponse {
        count: uploaded.len(),
        images: uploaded,
    })
}

/// Best-effort removal of objects from a failed batch
async fn compensate(store: &dyn ObjectStore, uploaded: &[UploadedImage]) {
    let deletions = uploaded.iter().map(|image| async move {
        if let Err(e) = store.delete(&image.key).await {
            tracing::warn!(key = %image.key, error = %e, "Failed to remove orphaned upload");
        }
    });
    join_all(deletions).await;
}
