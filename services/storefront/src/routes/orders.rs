//! Order routes

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    checkout,
    error::{ApiError, ApiResult},
    models::CreateOrderRequest,
    state::AppState,
    validation,
};

/// Place an order; payment status always starts as pending
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let order = checkout::place_order(&state, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order": order,
        })),
    ))
}

/// List every order with customer and products inlined
pub async fn get_orders(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let orders = state
        .order_store
        .get_all()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch orders", e))?;

    Ok(Json(checkout::expand_orders(&state, orders).await?))
}

/// Fetch one order with customer and products inlined
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = validation::parse_id(&id, "Invalid order id")?;

    let order = state
        .order_store
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch order", e))?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let mut views = checkout::expand_orders(&state, vec![order]).await?;
    let view = views
        .pop()
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(view))
}
