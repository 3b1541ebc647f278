//! Order repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use tracing::info;
use uuid::Uuid;

use super::OrderStore;
use crate::models::{NewOrder, Order, PAYMENT_STATUS_PENDING};

const ORDER_COLUMNS: &str =
    "id, user_id, products, name, address, payment_type, amount, payment_status, created_at";

/// PostgreSQL-backed order repository
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(&self, order: &NewOrder) -> Result<Order> {
        info!(
            "Creating order for user {} with {} line items",
            order.user_id,
            order.products.len()
        );

        let sql = format!(
            r#"
            INSERT INTO orders (user_id, products, name, address, payment_type, amount, payment_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );

        let created = sqlx::query_as::<_, Order>(&sql)
            .bind(order.user_id)
            .bind(Json(&order.products))
            .bind(&order.name)
            .bind(&order.address)
            .bind(&order.payment_type)
            .bind(order.amount)
            .bind(PAYMENT_STATUS_PENDING)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get_all(&self) -> Result<Vec<Order>> {
        let sql = format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS);

        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }
}
