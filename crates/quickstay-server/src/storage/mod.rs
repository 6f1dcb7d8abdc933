//! Object storage for uploaded images
//!
//! [`ObjectStore`] is the seam the upload slice talks to. [`Storage`] is the
//! S3-compatible implementation; [`InMemoryObjectStore`] backs tests and the
//! `memory` backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub mod config;
pub mod memory;

pub use memory::InMemoryObjectStore;

/// Write and remove publicly readable objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return its public URL
    async fn put_public(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    async fn delete(&self, key: &str) -> Result<()>;
}

pub type SharedObjectStore = Arc<dyn ObjectStore>;

/// Join a base URL and an object key
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key.trim_start_matches('/'))
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
    public_read_acl: bool,
}

impl Storage {
    pub fn new(config: config::StorageConfig) -> Result<Self> {
        debug!("Initializing storage with config: {:?}", config);

        let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key)
        else {
            anyhow::bail!("S3 credentials are not configured (S3_ACCESS_KEY / S3_SECRET_KEY)");
        };

        let credentials = Credentials::new(access_key, secret_key, None, None, "quickstay-storage");

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());
        let public_base_url = config.public_base_url();

        info!(
            bucket = %config.bucket,
            public_base_url = %public_base_url,
            "Storage client initialized"
        );

        Ok(Self {
            client,
            bucket: config.bucket,
            public_base_url,
            public_read_acl: config.public_read_acl,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for Storage {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put_public(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        debug!("Uploading {} bytes to s3://{}/{}", data.len(), self.bucket, key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data));

        if self.public_read_acl {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to upload to S3: {}", key))?;

        info!("Successfully uploaded to s3://{}/{}", self.bucket, key);

        Ok(public_url(&self.public_base_url, key))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<()> {
        debug!("Deleting s3://{}/{}", self.bucket, key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("Failed to delete from S3: {}", key))?;

        info!("Successfully deleted s3://{}/{}", self.bucket, key);

        Ok(())
    }
}
