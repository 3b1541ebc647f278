//! Account routes for users and admins
//!
//! Users and admins share one implementation parameterised by
//! [`AccountKind`]; the public handlers only pick the kind.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{AccountKind, AccountSummary, LoginRequest, NewAccount, ProfileQuery, RegisterRequest},
    password,
    repositories::DuplicateEmail,
    state::AppState,
    validation,
};

fn email_taken() -> ApiError {
    ApiError::BadRequest("Email already registered".to_string())
}

/// `{"message": ..., "<user|admin>": summary}`
fn account_body(kind: AccountKind, message: &str, summary: AccountSummary) -> ApiResult<Value> {
    let summary =
        serde_json::to_value(summary).map_err(|e| ApiError::internal("Failed to encode account", e))?;

    let mut body = Map::new();
    body.insert("message".to_string(), json!(message));
    body.insert(kind.response_key().to_string(), summary);
    Ok(Value::Object(body))
}

async fn register(
    state: &AppState,
    kind: AccountKind,
    payload: &RegisterRequest,
) -> ApiResult<AccountSummary> {
    let registration = validation::validate_registration(payload)?;

    info!("Registering {} {}", kind.response_key(), registration.email);

    let existing = state
        .account_store
        .find_by_email(kind, &registration.email)
        .await
        .map_err(|e| ApiError::internal("Failed to check existing account", e))?;

    if existing.is_some() {
        return Err(email_taken());
    }

    let password_hash = password::hash(registration.password)
        .await
        .map_err(|e| ApiError::internal("Failed to hash password", e))?;

    let new_account = NewAccount {
        first_name: registration.first_name,
        second_name: registration.second_name,
        email: registration.email,
        password_hash,
        profile_picture: registration.profile_picture,
    };

    let account = state
        .account_store
        .create(kind, &new_account)
        .await
        .map_err(|e| {
            // Lost a race against a concurrent registration
            if e.is::<DuplicateEmail>() {
                email_taken()
            } else {
                ApiError::internal("Failed to create account", e)
            }
        })?;

    Ok(AccountSummary::from(&account))
}

async fn authenticate(
    state: &AppState,
    kind: AccountKind,
    payload: &LoginRequest,
) -> ApiResult<AccountSummary> {
    let credentials = validation::validate_login(payload)?;

    info!("Login attempt for {} {}", kind.response_key(), credentials.email);

    let account = state
        .account_store
        .find_by_email(kind, &credentials.email)
        .await
        .map_err(|e| ApiError::internal("Failed to look up account", e))?;

    let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
    let matches = password::verify(stored_hash, credentials.password)
        .await
        .map_err(|e| ApiError::internal("Failed to verify password", e))?;

    match account {
        Some(account) if matches => Ok(AccountSummary::from(&account)),
        _ => Err(ApiError::Unauthorized("Invalid credentials".to_string())),
    }
}

async fn list_accounts(state: &AppState, kind: AccountKind) -> ApiResult<Vec<AccountSummary>> {
    let accounts = state
        .account_store
        .get_all(kind)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch accounts", e))?;

    Ok(accounts.iter().map(AccountSummary::from).collect())
}

/// Register a customer
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let summary = register(&state, AccountKind::User, &payload).await?;
    let message = format!("{} registered successfully", AccountKind::User.label());
    let body = account_body(AccountKind::User, &message, summary)?;

    Ok((StatusCode::CREATED, Json(body)))
}

/// Register an administrator
pub async fn create_admin(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let summary = register(&state, AccountKind::Admin, &payload).await?;
    let message = format!("{} registered successfully", AccountKind::Admin.label());
    let body = account_body(AccountKind::Admin, &message, summary)?;

    Ok((StatusCode::CREATED, Json(body)))
}

/// Customer login; returns the profile, no session is issued
pub async fn user_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let summary = authenticate(&state, AccountKind::User, &payload).await?;

    Ok(Json(account_body(AccountKind::User, "Login successful", summary)?))
}

/// Administrator login; returns the profile, no session is issued
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let summary = authenticate(&state, AccountKind::Admin, &payload).await?;

    Ok(Json(account_body(AccountKind::Admin, "Login successful", summary)?))
}

/// Look up an administrator by email
pub async fn get_admin_profile(
    State(state): State<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;

    let admin = state
        .account_store
        .find_by_email(AccountKind::Admin, email)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch admin profile", e))?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;

    Ok(Json(AccountSummary::from(&admin)))
}

/// List administrators
pub async fn get_admins(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(list_accounts(&state, AccountKind::Admin).await?))
}

/// List customers
pub async fn get_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(list_accounts(&state, AccountKind::User).await?))
}
