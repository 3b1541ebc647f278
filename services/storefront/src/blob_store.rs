//! Object storage for product images

use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{Client, config::Credentials, primitives::ByteStream};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::Settings;

/// Binary object storage reachable through public URLs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return the public URL of the new object
    async fn upload(&self, bytes: Vec<u8>, content_type: &str, extension: &str) -> Result<String>;

    /// Remove the object stored under `key`
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Object key for an upload: upload time in milliseconds plus extension.
///
/// Not content addressed; two uploads with the same extension in the same
/// millisecond share a key.
pub fn object_key(extension: &str, at: DateTime<Utc>) -> String {
    format!("{}.{}", at.timestamp_millis(), extension)
}

/// Last path segment of a stored object URL
pub fn key_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Result of the best-effort blob removal that accompanies an image deletion
#[derive(Debug, Clone, PartialEq)]
pub enum BlobCleanup {
    Removed,
    /// The stored URL had no usable key
    Skipped,
    Failed(String),
}

/// Delete the blob behind `url`, recording instead of propagating failures
pub async fn remove_blob_for(store: &dyn BlobStore, url: &str) -> BlobCleanup {
    let Some(key) = key_from_url(url) else {
        warn!("No object key in image url {}, skipping blob removal", url);
        return BlobCleanup::Skipped;
    };

    match store.delete(key).await {
        Ok(()) => BlobCleanup::Removed,
        Err(e) => {
            warn!("Failed to delete blob {}: {}", key, e);
            BlobCleanup::Failed(e.to_string())
        }
    }
}

/// Amazon S3 implementation
#[derive(Clone)]
pub struct S3BlobStore {
    s3_client: Client,
    bucket_name: String,
    region: String,
}

impl S3BlobStore {
    pub fn new(s3_client: Client, bucket_name: String, region: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            region,
        }
    }

    /// Build the S3 client from the explicit credentials in the settings
    pub async fn from_settings(settings: &Settings) -> Self {
        let credentials = Credentials::new(
            settings.aws_access_key_id.clone(),
            settings.aws_secret_access_key.clone(),
            None,
            None,
            "storefront-settings",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.aws_region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Self::new(
            Client::new(&config),
            settings.s3_bucket_name.clone(),
            settings.aws_region.clone(),
        )
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket_name, self.region, key
        )
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str, extension: &str) -> Result<String> {
        let key = object_key(extension, Utc::now());
        info!("Uploading image to S3: {} ({} bytes)", key, bytes.len());

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await?;

        Ok(self.public_url(&key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        info!("Deleting image from S3: {}", key);

        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        Ok(())
    }
}
