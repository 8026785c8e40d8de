use crate::server::{ApiError, ApiState};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, request::Parts};
use mcq_database::DatabaseError;
use mcq_database::entities::{Role, User, user};
use mcq_database::sea_orm::EntityTrait;
use tracing::debug;

const INVALID_CREDENTIALS: &str = "Invalid authentication credentials";
const INVALID_PAYLOAD: &str = "Invalid token payload";
const USER_NOT_FOUND: &str = "User not found";
const ADMIN_REQUIRED: &str = "Insufficient permissions. Admin role required.";

/// The caller behind a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

/// A [`CurrentUser`] whose role is `ADMIN`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl CurrentUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }

    /// Whether the caller may act on data owned by `user_id`.
    #[must_use]
    pub fn can_access(&self, user_id: i32) -> bool {
        self.is_admin() || self.0.id == user_id
    }
}

/// Extracts the token from an `Authorization: Bearer` header (scheme is case-insensitive).
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<ApiState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        let claims = state.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized(INVALID_CREDENTIALS)
        })?;
        let user_id = claims.user_id().ok_or_else(|| ApiError::unauthorized(INVALID_PAYLOAD))?;

        let user = User::find_by_id(user_id)
            .one(state.database.connection()?)
            .await
            .map_err(|e| DatabaseError::from_orm(e, "Loading token owner"))?
            .ok_or_else(|| ApiError::unauthorized(USER_NOT_FOUND))?;

        Ok(Self(user))
    }
}

impl FromRequestParts<ApiState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.is_admin() {
            return Err(ApiError::forbidden(ADMIN_REQUIRED));
        }
        Ok(Self(current.0))
    }
}
