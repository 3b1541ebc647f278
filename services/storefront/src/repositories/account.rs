//! Account repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{AccountStore, DuplicateEmail};
use crate::models::{Account, AccountKind, NewAccount};

const ACCOUNT_COLUMNS: &str =
    "id, first_name, second_name, email, password_hash, profile_picture";

/// PostgreSQL-backed account repository, serving both `users` and `admins`
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create(&self, kind: AccountKind, account: &NewAccount) -> Result<Account> {
        info!("Creating new {}: {}", kind.response_key(), account.email);

        let sql = format!(
            r#"
            INSERT INTO {} (first_name, second_name, email, password_hash, profile_picture)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            kind.table(),
            ACCOUNT_COLUMNS
        );

        let created = sqlx::query_as::<_, Account>(&sql)
            .bind(&account.first_name)
            .bind(&account.second_name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.profile_picture)
            .fetch_one(&self.pool)
            .await;

        match created {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DuplicateEmail.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, kind: AccountKind, email: &str) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE email = $1",
            ACCOUNT_COLUMNS,
            kind.table()
        );

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_by_id(&self, kind: AccountKind, id: Uuid) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            ACCOUNT_COLUMNS,
            kind.table()
        );

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_by_ids(&self, kind: AccountKind, ids: &[Uuid]) -> Result<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE id = ANY($1)",
            ACCOUNT_COLUMNS,
            kind.table()
        );

        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    async fn get_all(&self, kind: AccountKind) -> Result<Vec<Account>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at DESC",
            ACCOUNT_COLUMNS,
            kind.table()
        );

        let accounts = sqlx::query_as::<_, Account>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }
}
