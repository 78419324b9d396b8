use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::disease::PageParams;
use crate::api::error::ApiError;
use crate::api::middleware::AuthUser;
use crate::entities::feedback;
use crate::entities::notification::{self, NotificationType};

#[derive(Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<notification::Model>,
    pub total: usize,
    pub unread_count: u64,
}

pub async fn list_notifications(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let notifications = notification::Entity::find()
        .filter(notification::Column::UserId.eq(auth.id))
        .order_by_desc(notification::Column::CreatedAt)
        .offset(params.skip)
        .limit(params.limit)
        .all(&db)
        .await?;

    let unread_count = notification::Entity::find()
        .filter(notification::Column::UserId.eq(auth.id))
        .filter(notification::Column::IsRead.eq(false))
        .count(&db)
        .await?;

    let total = notifications.len();
    Ok((
        StatusCode::OK,
        Json(NotificationListResponse {
            notifications,
            total,
            unread_count,
        }),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    user_id: Uuid,
    diagnosis_id: Option<Uuid>,
    notification_type: NotificationType,
    title: String,
    body: String,
    scheduled_at: Option<chrono::NaiveDateTime>,
}

pub async fn create_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Response, ApiError> {
    auth.require_admin()?;

    if payload.title.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(ApiError::Validation(
            "title and body must not be empty".to_string(),
        ));
    }

    let new_notification = notification::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        diagnosis_id: Set(payload.diagnosis_id),
        notification_type: Set(payload.notification_type),
        title: Set(payload.title),
        body: Set(payload.body),
        is_read: Set(false),
        scheduled_at: Set(payload.scheduled_at),
        sent_at: Set(None),
        created_at: Set(Utc::now().naive_utc()),
    };

    let saved = new_notification.insert(&db).await?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

#[derive(Deserialize)]
pub struct UpdateNotificationRequest {
    is_read: bool,
}

pub async fn update_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(notification_id): Path<Uuid>,
    Json(payload): Json<UpdateNotificationRequest>,
) -> Result<Response, ApiError> {
    let n = match notification::Entity::find_by_id(notification_id)
        .one(&db)
        .await?
    {
        Some(n) if n.user_id == auth.id || auth.is_admin() => n,
        _ => return Err(ApiError::NotFound("Notification")),
    };

    let mut active = n.into_active_model();
    active.is_read = Set(payload.is_read);
    let updated = active.update(&db).await?;

    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_notification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(notification_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let n = match notification::Entity::find_by_id(notification_id)
        .one(&db)
        .await?
    {
        Some(n) if n.user_id == auth.id || auth.is_admin() => n,
        _ => return Err(ApiError::NotFound("Notification")),
    };

    n.delete(&db).await?;

    Ok((
        StatusCode::OK,
        Json(json!({"message": "Notification deleted"})),
    )
        .into_response())
}

// Feedback

#[derive(Deserialize)]
pub struct CreateFeedbackRequest {
    feedback_text: String,
    rating: i32,
}

#[derive(Serialize)]
pub struct FeedbackListResponse {
    pub feedbacks: Vec<feedback::Model>,
    pub total: usize,
    pub average_rating: f64,
}

pub async fn create_feedback(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateFeedbackRequest>,
) -> Result<Response, ApiError> {
    if payload.feedback_text.trim().is_empty() {
        return Err(ApiError::Validation(
            "feedback_text must not be empty".to_string(),
        ));
    }
    if !(1..=5).contains(&payload.rating) {
        return Err(ApiError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let new_feedback = feedback::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(auth.id),
        feedback_text: Set(payload.feedback_text),
        rating: Set(payload.rating),
        created_at: Set(Utc::now().naive_utc()),
    };

    let saved = new_feedback.insert(&db).await?;

    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

pub async fn list_feedback(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let feedbacks = feedback::Entity::find()
        .filter(feedback::Column::UserId.eq(auth.id))
        .order_by_desc(feedback::Column::CreatedAt)
        .all(&db)
        .await?;

    let total = feedbacks.len();
    let average_rating = if total == 0 {
        0.0
    } else {
        feedbacks.iter().map(|f| f.rating as f64).sum::<f64>() / total as f64
    };

    Ok((
        StatusCode::OK,
        Json(FeedbackListResponse {
            feedbacks,
            total,
            average_rating,
        }),
    )
        .into_response())
}
