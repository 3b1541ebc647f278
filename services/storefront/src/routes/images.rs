//! Catalog routes: upload, listing, cart lookup and deletion

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    blob_store::{self, BlobCleanup},
    error::{ApiError, ApiResult},
    models::{NewImage, UploadRequest},
    state::AppState,
    validation,
};

/// Upload a product image and create its catalog entry
pub async fn upload_image(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let upload = validation::validate_upload(&payload)?;

    info!(
        "Uploading image {} ({} bytes)",
        upload.name,
        upload.image.bytes.len()
    );

    let content_type = upload.image.content_type();
    let extension = upload.image.extension().to_string();
    let url = state
        .blob_store
        .upload(upload.image.bytes, &content_type, &extension)
        .await
        .map_err(|e| ApiError::internal("Failed to upload image", e))?;

    let new_image = NewImage {
        url: url.clone(),
        name: upload.name,
        price: upload.price,
        description: upload.description,
    };

    if let Err(e) = state.image_store.create(&new_image).await {
        // Do not leave an orphaned object behind
        if let BlobCleanup::Failed(reason) =
            blob_store::remove_blob_for(state.blob_store.as_ref(), &url).await
        {
            warn!("Orphaned blob {} left after failed insert: {}", url, reason);
        }
        return Err(ApiError::internal("Failed to save image", e));
    }

    Ok(Json(json!({
        "message": "Image uploaded successfully",
        "url": url,
    })))
}

/// List the whole catalog
pub async fn get_images(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let images = state
        .image_store
        .get_all()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch images", e))?;

    Ok(Json(images))
}

/// Resolve the images behind a cart's product ids
pub async fn get_cart_items(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;

    let Some(raw_ids) = payload.get("ids").and_then(Value::as_array) else {
        return Err(ApiError::BadRequest(
            "Invalid request: ids must be an array".to_string(),
        ));
    };

    let ids = raw_ids
        .iter()
        .map(|raw| {
            raw.as_str()
                .ok_or_else(|| ApiError::BadRequest("Invalid product id".to_string()))
                .and_then(|s| validation::parse_id(s, "Invalid product id").map_err(ApiError::from))
        })
        .collect::<ApiResult<Vec<Uuid>>>()?;

    let images = state
        .image_store
        .find_by_ids(&ids)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch cart items", e))?;

    Ok(Json(images))
}

/// Delete a catalog entry and, best effort, its blob
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = validation::parse_id(&id, "Invalid image id")?;

    let image = state
        .image_store
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch image", e))?
        .ok_or_else(|| ApiError::NotFound("Image not found".to_string()))?;

    let cleanup = blob_store::remove_blob_for(state.blob_store.as_ref(), &image.url).await;

    let deleted = state
        .image_store
        .delete(id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete image", e))?;

    if !deleted {
        return Err(ApiError::NotFound("Image not found".to_string()));
    }

    info!("Deleted image {} (blob cleanup: {:?})", id, cleanup);

    Ok(Json(json!({ "message": "Image deleted successfully" })))
}
