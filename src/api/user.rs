use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::middleware::AuthUser;
use crate::entities::user;

#[derive(serde::Deserialize)]
pub struct UpdateUserRequest {
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let account = user::Entity::find_by_id(auth.id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok((StatusCode::OK, Json(account)).into_response())
}

// Role and email are deliberately not updatable through this path.
pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let account = user::Entity::find_by_id(auth.id)
        .one(&db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut active = account.into_active_model();
    if let Some(name) = payload.name {
        if name.trim().len() < 2 {
            return Err(ApiError::Validation(
                "name must be at least 2 characters".to_string(),
            ));
        }
        active.name = Set(name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&db).await?;

    tracing::Span::current()
        .record("table", "users")
        .record("action", "update_user")
        .record("user_id", tracing::field::display(updated.id));

    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let res = user::Entity::delete_by_id(auth.id).exec(&db).await?;
    if res.rows_affected == 0 {
        return Err(ApiError::NotFound("User"));
    }

    metrics::gauge!("farmpulse_users_total").decrement(1.0);

    Ok((StatusCode::OK, Json(json!({"message": "User deleted"}))).into_response())
}
