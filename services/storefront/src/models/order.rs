//! Order model and the expanded views returned by the read endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Account, Image};

/// Every order starts, and in this service stays, in this state
pub const PAYMENT_STATUS_PENDING: &str = "pending";

/// One product reference with its quantity, stored inside the order document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Order entity; line items live in a JSONB column
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(json)]
    pub products: Vec<LineItem>,
    pub name: String,
    pub address: String,
    pub payment_type: String,
    pub amount: f64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

/// Validated order ready to persist
///
/// There is no payment status here: the store always writes
/// [`PAYMENT_STATUS_PENDING`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub products: Vec<LineItem>,
    pub name: String,
    pub address: String,
    pub payment_type: String,
    pub amount: f64,
}

impl NewOrder {
    /// Distinct product ids in first-seen order
    pub fn distinct_product_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::with_capacity(self.products.len());
        for item in &self.products {
            if !ids.contains(&item.product_id) {
                ids.push(item.product_id);
            }
        }
        ids
    }
}

/// Raw line item as sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<serde_json::Value>,
}

/// Order creation request body
///
/// Unknown fields, including any `paymentStatus`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<String>,
    pub products: Option<Vec<LineItemRequest>>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub payment_type: Option<String>,
    pub amount: Option<serde_json::Value>,
}

/// Customer fields inlined into an order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub id: Uuid,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
}

impl From<&Account> for OrderCustomer {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            second_name: account.second_name.clone(),
            email: account.email.clone(),
        }
    }
}

/// Product fields inlined into a line item
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderProduct {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

impl From<&Image> for OrderProduct {
    fn from(image: &Image) -> Self {
        Self {
            id: image.id,
            name: image.name.clone(),
            price: image.price,
        }
    }
}

/// Line item with its product expanded; `product` is `None` once the image
/// has been deleted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub product_id: Uuid,
    pub quantity: i64,
    pub product: Option<OrderProduct>,
}

/// Order with its cross references expanded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user: Option<OrderCustomer>,
    pub products: Vec<LineItemView>,
    pub name: String,
    pub address: String,
    pub payment_type: String,
    pub amount: f64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}
