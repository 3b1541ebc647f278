//! Repositories for database operations
//!
//! Handlers talk to the stores through these traits; production wires the
//! PostgreSQL implementations in, tests swap in in-memory ones.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Account, AccountKind, Image, NewAccount, NewImage, NewOrder, Order};

pub mod account;
pub mod image;
pub mod order;

pub use account::AccountRepository;
pub use image::ImageRepository;
pub use order::OrderRepository;

/// Raised by [`AccountStore::create`] when the email is already taken
#[derive(Debug, Error)]
#[error("Email already registered")]
pub struct DuplicateEmail;

/// Users and admins
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert an account; fails with [`DuplicateEmail`] on an email clash
    async fn create(&self, kind: AccountKind, account: &NewAccount) -> Result<Account>;

    /// Exact, case-sensitive email lookup
    async fn find_by_email(&self, kind: AccountKind, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, kind: AccountKind, id: Uuid) -> Result<Option<Account>>;

    async fn find_by_ids(&self, kind: AccountKind, ids: &[Uuid]) -> Result<Vec<Account>>;

    async fn get_all(&self, kind: AccountKind) -> Result<Vec<Account>>;
}

/// Product images
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn create(&self, image: &NewImage) -> Result<Image>;

    async fn get_all(&self) -> Result<Vec<Image>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>>;

    /// Batch lookup; ids that do not exist are simply absent from the result
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Image>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist with payment status `pending` and the current timestamp
    async fn create(&self, order: &NewOrder) -> Result<Order>;

    async fn get_all(&self) -> Result<Vec<Order>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>>;
}
