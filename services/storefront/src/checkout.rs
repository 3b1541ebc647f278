//! Order placement and order expansion
//!
//! Orders reference users and images without database foreign keys, so
//! referential integrity is checked here. Every check runs before the single
//! insert: there is nothing to roll back if a check fails.

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        AccountKind, CreateOrderRequest, LineItemView, Order, OrderCustomer, OrderProduct, OrderView,
    },
    state::AppState,
    validation,
};

/// Validate, resolve references, then persist an order
///
/// 1. shape validation of fields, ids and quantities
/// 2. the user must exist
/// 3. every distinct product id must resolve, checked with one batch lookup
/// 4. insert with payment status forced to pending
pub async fn place_order(state: &AppState, request: &CreateOrderRequest) -> ApiResult<Order> {
    let new_order = validation::validate_order(request)?;

    let user = state
        .account_store
        .find_by_id(AccountKind::User, new_order.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to look up user", e))?;

    if user.is_none() {
        info!("Rejecting order for unknown user {}", new_order.user_id);
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let product_ids = new_order.distinct_product_ids();
    let found = state
        .image_store
        .find_by_ids(&product_ids)
        .await
        .map_err(|e| ApiError::internal("Failed to look up products", e))?;

    if found.len() < product_ids.len() {
        info!(
            "Rejecting order: {} of {} products found",
            found.len(),
            product_ids.len()
        );
        return Err(ApiError::NotFound(
            "One or more products not found".to_string(),
        ));
    }

    let order = state
        .order_store
        .create(&new_order)
        .await
        .map_err(|e| ApiError::internal("Failed to create order", e))?;

    info!("Order {} created for user {}", order.id, order.user_id);
    Ok(order)
}

/// Inline the customer and product details into each order
///
/// Users and products are fetched in one batch each, whatever the number of
/// orders. References that no longer resolve are returned as `null`.
pub async fn expand_orders(state: &AppState, orders: Vec<Order>) -> ApiResult<Vec<OrderView>> {
    let mut user_ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let mut product_ids: Vec<Uuid> = orders
        .iter()
        .flat_map(|o| o.products.iter().map(|item| item.product_id))
        .collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let users: HashMap<Uuid, OrderCustomer> = state
        .account_store
        .find_by_ids(AccountKind::User, &user_ids)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch order customers", e))?
        .iter()
        .map(|account| (account.id, OrderCustomer::from(account)))
        .collect();

    let products: HashMap<Uuid, OrderProduct> = state
        .image_store
        .find_by_ids(&product_ids)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch order products", e))?
        .iter()
        .map(|image| (image.id, OrderProduct::from(image)))
        .collect();

    let views = orders
        .into_iter()
        .map(|order| {
            let user = users.get(&order.user_id).cloned();
            if user.is_none() {
                warn!("Order {} references missing user {}", order.id, order.user_id);
            }

            OrderView {
                id: order.id,
                user_id: order.user_id,
                user,
                products: order
                    .products
                    .into_iter()
                    .map(|item| LineItemView {
                        product: products.get(&item.product_id).cloned(),
                        product_id: item.product_id,
                        quantity: item.quantity,
                    })
                    .collect(),
                name: order.name,
                address: order.address,
                payment_type: order.payment_type,
                amount: order.amount,
                payment_status: order.payment_status,
                created_at: order.created_at,
            }
        })
        .collect();

    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{LineItemRequest, NewImage, PAYMENT_STATUS_PENDING},
        repositories::ImageStore,
        testing::{TestStores, seed_user},
    };
    use serde_json::json;

    async fn seed_image(stores: &TestStores, name: &str, price: f64) -> Uuid {
        stores
            .images
            .create(&NewImage {
                url: format!("memory://blobs/{}.png", name),
                name: name.to_string(),
                price,
                description: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    fn request(user_id: Uuid, items: &[(Uuid, i64)]) -> CreateOrderRequest {
        CreateOrderRequest {
            user_id: Some(user_id.to_string()),
            products: Some(
                items
                    .iter()
                    .map(|(id, qty)| LineItemRequest {
                        product_id: Some(id.to_string()),
                        quantity: Some(json!(qty)),
                    })
                    .collect(),
            ),
            name: Some("Ada Lovelace".into()),
            address: Some("12 Analytical Row".into()),
            payment_type: Some("card".into()),
            amount: Some(json!(30)),
        }
    }

    #[tokio::test]
    async fn test_place_order_persists_pending_order() {
        let stores = TestStores::new();
        let state = stores.state();
        let user = seed_user(&stores, "ada@example.com").await;
        let print = seed_image(&stores, "print", 10.0).await;

        let order = place_order(&state, &request(user, &[(print, 3)])).await.unwrap();

        assert_eq!(order.payment_status, PAYMENT_STATUS_PENDING);
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].quantity, 3);
        assert_eq!(stores.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_user_creates_nothing() {
        let stores = TestStores::new();
        let state = stores.state();
        let print = seed_image(&stores, "print", 10.0).await;

        let result = place_order(&state, &request(Uuid::new_v4(), &[(print, 1)])).await;

        assert!(matches!(result, Err(ApiError::NotFound(msg)) if msg == "User not found"));
        assert_eq!(stores.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_one_missing_product_creates_nothing() {
        let stores = TestStores::new();
        let state = stores.state();
        let user = seed_user(&stores, "ada@example.com").await;
        let print = seed_image(&stores, "print", 10.0).await;

        let result = place_order(&state, &request(user, &[(print, 1), (Uuid::new_v4(), 1)])).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(stores.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_repeated_product_counts_once() {
        let stores = TestStores::new();
        let state = stores.state();
        let user = seed_user(&stores, "ada@example.com").await;
        let print = seed_image(&stores, "print", 10.0).await;

        let order = place_order(&state, &request(user, &[(print, 1), (print, 2)]))
            .await
            .unwrap();

        assert_eq!(order.products.len(), 2);
    }

    #[tokio::test]
    async fn test_expand_orders_inlines_references() {
        let stores = TestStores::new();
        let state = stores.state();
        let user = seed_user(&stores, "ada@example.com").await;
        let print = seed_image(&stores, "print", 10.0).await;
        let poster = seed_image(&stores, "poster", 25.0).await;

        let order = place_order(&state, &request(user, &[(print, 1), (poster, 2)]))
            .await
            .unwrap();

        // Deleting an image afterwards leaves the order intact
        stores.images.delete(poster).await.unwrap();

        let views = expand_orders(&state, vec![order]).await.unwrap();
        let view = &views[0];

        assert_eq!(view.user.as_ref().unwrap().email, "ada@example.com");
        assert_eq!(view.products[0].product.as_ref().unwrap().name, "print");
        assert_eq!(view.products[0].product.as_ref().unwrap().price, 10.0);
        assert!(view.products[1].product.is_none());
        assert_eq!(view.products[1].quantity, 2);
    }
}
