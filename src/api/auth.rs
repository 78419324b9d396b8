use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::{password, TokenKeys};
use crate::entities::user::{self, UserRole};

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
    address: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: user::Model,
}

/// Password policy: at least 8 chars with a digit, an uppercase and a
/// lowercase letter. Rejected before any hashing happens.
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "password must contain at least one digit".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(ApiError::Validation(
            "password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(ApiError::Validation(
            "password must contain at least one lowercase letter".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation("malformed email address".to_string()))
    }
}

pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Extension(keys): Extension<TokenKeys>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if payload.name.trim().len() < 2 {
        return Err(ApiError::Validation(
            "name must be at least 2 characters".to_string(),
        ));
    }
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(payload.email.clone()))
        .one(&db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)
        .map_err(|_| ApiError::Validation("invalid password".to_string()))?;

    let now = Utc::now().naive_utc();
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        role: Set(UserRole::Farmer),
        phone: Set(payload.phone),
        address: Set(payload.address),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let saved = new_user.insert(&db).await.map_err(ApiError::from)?;

    tracing::Span::current()
        .record("table", "users")
        .record("action", "register_user")
        .record("user_id", tracing::field::display(saved.id))
        .record("user_email", &saved.email);

    metrics::counter!("farmpulse_users_registered_total").increment(1);
    metrics::gauge!("farmpulse_users_total").increment(1.0);

    let access_token = keys.issue_access(saved.id, &saved.role, Utc::now());
    let refresh_token = keys.issue_refresh(saved.id, Utc::now());

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer",
            user: saved,
        }),
    )
        .into_response())
}

// Unknown email and bad password produce the identical 401 so callers
// cannot probe which addresses are registered.
const BAD_CREDENTIALS: &str = "incorrect email or password";

pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Extension(keys): Extension<TokenKeys>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(payload.email.clone()))
        .one(&db)
        .await?;

    let account = match found {
        Some(u) => u,
        None => {
            tracing::Span::current()
                .record("action", "login_user_failed")
                .record("error", "unknown_email");
            return Err(ApiError::Unauthenticated(BAD_CREDENTIALS));
        }
    };

    if !password::verify_password(&payload.password, &account.password_hash) {
        tracing::Span::current()
            .record("action", "login_user_failed")
            .record("error", "invalid_credentials");
        return Err(ApiError::Unauthenticated(BAD_CREDENTIALS));
    }

    tracing::Span::current()
        .record("table", "users")
        .record("action", "login_user")
        .record("user_id", tracing::field::display(account.id))
        .record("user_email", &account.email);

    let access_token = keys.issue_access(account.id, &account.role, Utc::now());
    let refresh_token = keys.issue_refresh(account.id, Utc::now());

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer",
            user: account,
        }),
    )
        .into_response())
}
