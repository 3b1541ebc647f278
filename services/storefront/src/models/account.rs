//! Account model shared by customers and administrators

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which collection an account lives in
///
/// Users and admins have the same shape but separate storage, so an email
/// can be registered once as each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    User,
    Admin,
}

impl AccountKind {
    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            AccountKind::User => "users",
            AccountKind::Admin => "admins",
        }
    }

    /// Key used for the account object in JSON responses
    pub fn response_key(&self) -> &'static str {
        match self {
            AccountKind::User => "user",
            AccountKind::Admin => "admin",
        }
    }

    /// Human readable label for messages
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::User => "User",
            AccountKind::Admin => "Admin",
        }
    }
}

/// Account entity as stored; carries the password hash and is never serialized
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: String,
}

/// New account creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub profile_picture: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            second_name: account.second_name.clone(),
            email: account.email.clone(),
            profile_picture: account.profile_picture.clone(),
        }
    }
}

/// Registration request body for both `/create-users` and `/create-admins`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture: Option<String>,
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Query parameters for the admin profile lookup
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileQuery {
    pub email: Option<String>,
}
