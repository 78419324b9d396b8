use axum::{
    extract::{Extension, Request},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::{TokenError, TokenKeys};
use crate::entities::user::UserRole;

/// Identity resolved from a valid access token, inserted into request
/// extensions for handlers.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Farmer => false,
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.role {
            UserRole::Admin => Ok(()),
            UserRole::Farmer => Err(ApiError::Forbidden("admin role required")),
        }
    }
}

/// Rejects requests without a usable bearer token. An absent header is
/// reported separately from a rejected credential.
pub async fn auth_middleware(
    Extension(keys): Extension<TokenKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthenticated("no credential supplied"))?;

    let token = header_value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated("credential rejected"))?;

    let claims = keys.decode(token).map_err(|e| match e {
        TokenError::Expired => ApiError::Unauthenticated("credential expired"),
        TokenError::Invalid => ApiError::Unauthenticated("credential rejected"),
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthenticated("credential rejected"))?;

    // Refresh tokens carry no role and cannot be used against the API.
    let role = claims
        .role
        .as_deref()
        .and_then(UserRole::parse)
        .ok_or(ApiError::Unauthenticated("credential rejected"))?;

    request.extensions_mut().insert(AuthUser { id: user_id, role });

    Ok(next.run(request).await)
}
