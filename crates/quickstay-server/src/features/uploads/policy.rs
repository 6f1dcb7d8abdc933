//! What an image upload may look like and where it is stored

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::UploadConfig;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Multipart field carrying the files
pub const IMAGES_FIELD: &str = "images";

/// Headroom for multipart boundaries and part headers on top of the file bytes
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_bytes: usize,
    pub max_files: usize,
}

impl UploadPolicy {
    pub fn new(max_file_bytes: usize, max_files: usize) -> Self {
        Self {
            max_file_bytes,
            max_files,
        }
    }

    /// Request body limit: every file at its maximum plus framing
    pub fn body_limit(&self) -> usize {
        self.max_file_bytes
            .saturating_mul(self.max_files)
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    /// Accept when either the extension or the declared content type says image.
    pub fn is_image(&self, file_name: &str, content_type: &str) -> bool {
        let allowed_ext = extension_of(file_name)
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        allowed_ext || content_type.trim().to_ascii_lowercase().starts_with("image/")
    }
}

impl From<&UploadConfig> for UploadPolicy {
    fn from(config: &UploadConfig) -> Self {
        let mb = usize::try_from(config.max_file_size_mb).unwrap_or(usize::MAX);
        Self::new(mb.saturating_mul(1024 * 1024), config.max_files)
    }
}

/// Lowercased extension after the last dot, if any
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// `uploads/images/{YYYY-MM-DD}/{uuid}.{ext}`, with `bin` when there is no extension
pub fn object_key(now: DateTime<Utc>, id: Uuid, file_name: &str) -> String {
    let ext = extension_of(file_name).unwrap_or_else(|| "bin".to_string());
    format!("uploads/images/{}/{}.{}", now.format("%Y-%m-%d"), id, ext)
}
