//! Storefront routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod accounts;
pub mod images;
pub mod orders;

/// Create the router for the storefront service
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Catalog
        .route("/upload", post(images::upload_image))
        .route("/images", get(images::get_images))
        .route("/cart-items", post(images::get_cart_items))
        .route("/delete-image/:id", delete(images::delete_image))
        // Admins
        .route("/create-admins", post(accounts::create_admin))
        .route("/admin-login", post(accounts::admin_login))
        .route("/admin/profile", get(accounts::get_admin_profile))
        .route("/admin/admins", get(accounts::get_admins))
        .route("/admin/users", get(accounts::get_users))
        // Users
        .route("/create-users", post(accounts::create_user))
        .route("/user-login", post(accounts::user_login))
        // Orders
        .route("/create-order", post(orders::create_order))
        .route("/orders", get(orders::get_orders))
        .route("/order/:id", get(orders::get_order))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "storefront"
    }))
}
