//! Service settings loaded once at startup

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Default request body cap; leaves room for a base64-encoded 5 MiB image
const DEFAULT_MAX_BODY_BYTES: i64 = 10 * 1024 * 1024;

/// Storefront settings
///
/// # Environment Variables
/// - `PORT`: Listen port (default: 5000)
/// - `AWS_REGION`: Region of the image bucket (required)
/// - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`: S3 credentials (required)
/// - `S3_BUCKET_NAME`: Bucket holding product images (required)
/// - `MAX_BODY_BYTES`: Maximum accepted request body (default: 10 MiB)
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub port: u16,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub s3_bucket_name: String,
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("port", &self.port)
            .field("aws_region", &self.aws_region)
            .field("aws_access_key_id", &"<redacted>")
            .field("aws_secret_access_key", &"<redacted>")
            .field("s3_bucket_name", &self.s3_bucket_name)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Settings {
    /// Build the settings from the process environment
    pub fn from_env() -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("port", 5000_i64)?
            .set_default("max_body_bytes", DEFAULT_MAX_BODY_BYTES)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid storefront configuration: {}", e))?;

        for (key, value) in [
            ("AWS_REGION", &settings.aws_region),
            ("AWS_ACCESS_KEY_ID", &settings.aws_access_key_id),
            ("AWS_SECRET_ACCESS_KEY", &settings.aws_secret_access_key),
            ("S3_BUCKET_NAME", &settings.s3_bucket_name),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} environment variable is empty", key);
            }
        }

        Ok(settings)
    }
}
