use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;

/// Terminal, caller-visible failures. Every variant maps to one stable
/// status code; internals are never exposed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(DbErr),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::Database(_) | ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        // Unique-index violations surface as Conflict; covers the race where
        // two inserts pass the pre-check concurrently.
        let msg = e.to_string();
        if msg.contains("duplicate key value violates unique constraint")
            || msg.contains("UNIQUE constraint failed")
        {
            return ApiError::Conflict("resource already exists".to_string());
        }
        ApiError::Database(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!("database error: {}", e);
                tracing::Span::current().record("error", tracing::field::display(e));
                "internal server error".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let status = self.status();
        (status, Json(json!({"error": self.kind(), "message": message}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable_per_kind() {
        assert_eq!(
            ApiError::Unauthenticated("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Farm").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn duplicate_key_errors_become_conflict() {
        let e = DbErr::Custom(
            "error returned from database: duplicate key value violates unique constraint \
             \"users_email_key\""
                .to_string(),
        );
        assert!(matches!(ApiError::from(e), ApiError::Conflict(_)));

        let e = DbErr::Custom("UNIQUE constraint failed: users.email".to_string());
        assert!(matches!(ApiError::from(e), ApiError::Conflict(_)));

        let e = DbErr::Custom("connection reset".to_string());
        assert!(matches!(ApiError::from(e), ApiError::Database(_)));
    }
}
