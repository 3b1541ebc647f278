//! Product image model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry; `url` points at the blob store object
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// New catalog entry, created after a successful blob upload
#[derive(Debug, Clone)]
pub struct NewImage {
    pub url: String,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Upload request body
///
/// `price` is kept as raw JSON so both `12.5` and `"12.5"` are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    pub image: Option<String>,
    pub name: Option<String>,
    pub price: Option<serde_json::Value>,
    pub description: Option<String>,
}
