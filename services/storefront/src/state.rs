//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    blob_store::BlobStore,
    repositories::{AccountStore, ImageStore, OrderStore},
};

/// Application state shared across handlers
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub account_store: Arc<dyn AccountStore>,
    pub image_store: Arc<dyn ImageStore>,
    pub order_store: Arc<dyn OrderStore>,
    pub blob_store: Arc<dyn BlobStore>,
}
