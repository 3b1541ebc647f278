//! In-memory stores and request helpers for tests

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use common::database::{DatabaseConfig, init_pool, run_migrations};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    blob_store::{BlobStore, object_key},
    models::{
        Account, AccountKind, Image, NewAccount, NewImage, NewOrder, Order,
        PAYMENT_STATUS_PENDING,
    },
    password,
    repositories::{AccountStore, DuplicateEmail, ImageStore, OrderStore},
    state::AppState,
};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<AccountKind, Vec<Account>>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, kind: AccountKind, account: &NewAccount) -> Result<Account> {
        let mut accounts = self.accounts.lock().await;
        let table = accounts.entry(kind).or_default();

        if table.iter().any(|a| a.email == account.email) {
            return Err(DuplicateEmail.into());
        }

        let created = Account {
            id: Uuid::new_v4(),
            first_name: account.first_name.clone(),
            second_name: account.second_name.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            profile_picture: account.profile_picture.clone(),
        };
        table.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, kind: AccountKind, email: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .get(&kind)
            .and_then(|table| table.iter().find(|a| a.email == email).cloned()))
    }

    async fn find_by_id(&self, kind: AccountKind, id: Uuid) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .get(&kind)
            .and_then(|table| table.iter().find(|a| a.id == id).cloned()))
    }

    async fn find_by_ids(&self, kind: AccountKind, ids: &[Uuid]) -> Result<Vec<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .get(&kind)
            .map(|table| {
                table
                    .iter()
                    .filter(|a| ids.contains(&a.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_all(&self, kind: AccountKind) -> Result<Vec<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .get(&kind)
            .map(|table| table.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MemoryImageStore {
    images: Mutex<Vec<Image>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn create(&self, image: &NewImage) -> Result<Image> {
        let created = Image {
            id: Uuid::new_v4(),
            url: image.url.clone(),
            name: image.name.clone(),
            price: image.price,
            description: image.description.clone(),
            created_at: Utc::now(),
        };
        self.images.lock().await.push(created.clone());
        Ok(created)
    }

    async fn get_all(&self) -> Result<Vec<Image>> {
        Ok(self.images.lock().await.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>> {
        Ok(self
            .images
            .lock()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Image>> {
        Ok(self
            .images
            .lock()
            .await
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut images = self.images.lock().await;
        let before = images.len();
        images.retain(|i| i.id != id);
        Ok(images.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create(&self, order: &NewOrder) -> Result<Order> {
        let created = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            products: order.products.clone(),
            name: order.name.clone(),
            address: order.address.clone(),
            payment_type: order.payment_type.clone(),
            amount: order.amount,
            payment_status: PAYMENT_STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        };
        self.orders.lock().await.push(created.clone());
        Ok(created)
    }

    async fn get_all(&self) -> Result<Vec<Order>> {
        Ok(self.orders.lock().await.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }
}

/// Blob store keeping objects in memory; failures can be switched on
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    uploads: AtomicU64,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, bytes: Vec<u8>, _content_type: &str, extension: &str) -> Result<String> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            anyhow::bail!("simulated upload failure");
        }

        // Prefix with a counter; tests upload faster than one per millisecond
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        let key = format!("{}-{}", n, object_key(extension, Utc::now()));
        self.objects.lock().await.insert(key.clone(), bytes);
        Ok(format!("memory://blobs/{}", key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            anyhow::bail!("simulated delete failure");
        }

        self.objects.lock().await.remove(key);
        Ok(())
    }
}

/// Handles on every in-memory store behind an [`AppState`]
pub struct TestStores {
    pub accounts: Arc<MemoryAccountStore>,
    pub images: Arc<MemoryImageStore>,
    pub orders: Arc<MemoryOrderStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestStores {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(MemoryAccountStore::default()),
            images: Arc::new(MemoryImageStore::default()),
            orders: Arc::new(MemoryOrderStore::default()),
            blobs: Arc::new(MemoryBlobStore::default()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            account_store: self.accounts.clone(),
            image_store: self.images.clone(),
            order_store: self.orders.clone(),
            blob_store: self.blobs.clone(),
        }
    }

    pub async fn order_count(&self) -> usize {
        self.orders.orders.lock().await.len()
    }

    pub async fn account_count(&self, kind: AccountKind) -> usize {
        self.accounts
            .accounts
            .lock()
            .await
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

/// Insert a user whose password is `password123`
pub async fn seed_user(stores: &TestStores, email: &str) -> Uuid {
    stores
        .accounts
        .create(
            AccountKind::User,
            &NewAccount {
                first_name: "Ada".to_string(),
                second_name: "Lovelace".to_string(),
                email: email.to_string(),
                password_hash: password::hash_password("password123").unwrap(),
                profile_picture: String::new(),
            },
        )
        .await
        .unwrap()
        .id
}

/// `data:image/<subtype>;base64,...` wrapping `len` bytes
pub fn data_uri(subtype: &str, len: usize) -> String {
    format!(
        "data:image/{};base64,{}",
        subtype,
        STANDARD.encode(vec![0xAB_u8; len])
    )
}

/// Send one request through the router and decode the JSON response
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Pool on `DATABASE_URL` with the schema migrated, for the ignored live
/// database tests
pub async fn live_pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let pool = init_pool(&config).await.expect("Failed to connect to database");
    run_migrations(&pool).await.expect("Failed to apply migrations");
    pool
}
