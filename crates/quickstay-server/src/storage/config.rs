use serde::{Deserialize, Serialize};
use std::env;

use quickstay_common::env::{first_of, flag_or};

pub const DEFAULT_S3_REGION: &str = "us-east-1";

#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
    /// Base of the URLs handed back to clients; derived from bucket and region when unset
    pub public_url: Option<String>,
    /// Upload objects with the `public-read` canned ACL
    pub public_read_acl: bool,
}

impl StorageConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bucket = first_of(&["S3_BUCKET", "AWS_S3_BUCKET"])
            .ok_or_else(|| anyhow::anyhow!("S3_BUCKET (or AWS_S3_BUCKET) is not configured"))?;

        Ok(Self {
            endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
            region: first_of(&["S3_REGION", "AWS_REGION"])
                .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            bucket,
            access_key: first_of(&["S3_ACCESS_KEY", "AWS_ACCESS_KEY_ID"]),
            secret_key: first_of(&["S3_SECRET_KEY", "AWS_SECRET_ACCESS_KEY"]),
            path_style: flag_or("S3_PATH_STYLE", false),
            public_url: first_of(&["S3_PUBLIC_URL", "AWS_S3_PUBLIC_URL"]),
            public_read_acl: flag_or("S3_PUBLIC_READ_ACL", true),
        })
    }

    pub fn for_minio(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let bucket = bucket.into();
        Self {
            public_url: Some(format!("{}/{}", endpoint.trim_end_matches('/'), bucket)),
            endpoint: Some(endpoint),
            region: DEFAULT_S3_REGION.to_string(),
            bucket,
            access_key: Some("minioadmin".to_string()),
            secret_key: Some("minioadmin".to_string()),
            path_style: true,
            public_read_acl: false,
        }
    }

    /// Public URL prefix without a trailing slash
    pub fn public_base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let tld = if self.region.starts_with("cn-") {
                    "amazonaws.com.cn"
                } else {
                    "amazonaws.com"
                };
                format!("https://{}.s3.{}.{}", self.bucket, self.region, tld)
            },
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("path_style", &self.path_style)
            .field("public_url", &self.public_url)
            .field("public_read_acl", &self.public_read_acl)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "S3_BUCKET",
        "AWS_S3_BUCKET",
        "S3_REGION",
        "AWS_REGION",
        "S3_ENDPOINT",
        "S3_ACCESS_KEY",
        "AWS_ACCESS_KEY_ID",
        "S3_SECRET_KEY",
        "AWS_SECRET_ACCESS_KEY",
        "S3_PATH_STYLE",
        "S3_PUBLIC_URL",
        "AWS_S3_PUBLIC_URL",
        "S3_PUBLIC_READ_ACL",
    ];

    fn clear() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_for_minio() {
        let config = StorageConfig::for_minio("http://localhost:9000/", "test-bucket");
        assert_eq!(config.endpoint, Some("http://localhost:9000/".to_string()));
        assert!(config.path_style);
        assert_eq!(config.public_base_url(), "http://localhost:9000/test-bucket");
    }

    #[test]
    #[serial]
    fn test_from_env_requires_bucket() {
        clear();
        assert!(StorageConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_aws_fallbacks() {
        clear();
        env::set_var("AWS_S3_BUCKET", "quickstay-media");
        env::set_var("AWS_REGION", "ap-south-1");
        env::set_var("AWS_ACCESS_KEY_ID", "key");

        let config = StorageConfig::from_env().unwrap();
        assert_eq!(config.bucket, "quickstay-media");
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.access_key.as_deref(), Some("key"));
        assert!(config.public_read_acl);
        assert_eq!(
            config.public_base_url(),
            "https://quickstay-media.s3.ap-south-1.amazonaws.com"
        );

        clear();
    }

    #[test]
    #[serial]
    fn test_explicit_public_url_wins() {
        clear();
        env::set_var("S3_BUCKET", "media");
        env::set_var("S3_PUBLIC_URL", "https://cdn.quickstay.homes/");
        env::set_var("S3_PUBLIC_READ_ACL", "false");

        let config = StorageConfig::from_env().unwrap();
        assert_eq!(config.public_base_url(), "https://cdn.quickstay.homes");
        assert!(!config.public_read_acl);

        clear();
    }

    #[test]
    fn test_china_regions_use_cn_domain() {
        let mut config = StorageConfig::for_minio("http://localhost:9000", "media");
        config.public_url = None;
        config.region = "cn-north-1".to_string();
        assert_eq!(
            config.public_base_url(),
            "https://media.s3.cn-north-1.amazonaws.com.cn"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StorageConfig::for_minio("http://localhost:9000", "media");
        assert!(!format!("{:?}", config).contains("minioadmin"));
    }
}
