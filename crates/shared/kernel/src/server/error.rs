use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use mcq_database::DatabaseError;
use serde::Serialize;
use std::borrow::Cow;
use tracing::error;

use crate::security::{PasswordError, TokenError};

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by every handler, rendered as `{"detail": "<message>"}`.
#[mcq_derive::mcq_error]
pub enum ApiError {
    #[status(422)]
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(400)]
    #[error("{message}")]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(401)]
    #[error("{message}")]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(403)]
    #[error("{message}")]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(404)]
    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(503)]
    #[error("{message}")]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

const INTERNAL_DETAIL: &str = "Internal server error";
const UNAVAILABLE_DETAIL: &str = "Database unavailable";

impl ApiError {
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest { message: message.into(), context: None }
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized { message: message.into(), context: None }
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden { message: message.into(), context: None }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    /// Maps a domain error onto the variant matching its HTTP status.
    ///
    /// Server-side failures keep their message out of the response; it is logged instead.
    pub fn from_status(status: u16, message: impl Into<Cow<'static, str>>) -> Self {
        let message = message.into();
        match status {
            400 => Self::BadRequest { message, context: None },
            401 => Self::Unauthorized { message, context: None },
            403 => Self::Forbidden { message, context: None },
            404 => Self::NotFound { message, context: None },
            422 => Self::Validation { message, context: None },
            503 => {
                error!(%message, "Database unavailable");
                Self::Unavailable { message: UNAVAILABLE_DETAIL.into(), context: None }
            },
            _ => {
                error!(%message, status, "Request failed");
                Self::Internal { message: INTERNAL_DETAIL.into(), context: None }
            },
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(ErrorBody { detail: self.to_string() })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        Self::from_status(err.status(), err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::from_status(err.status(), err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::from_status(err.status(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, Option<HeaderValue>, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let auth = response.headers().get(header::WWW_AUTHENTICATE).cloned();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, auth, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_carries_bearer_challenge() {
        let (status, auth, body) = body_of(ApiError::unauthorized("Incorrect email or password")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(auth.unwrap(), "Bearer");
        assert_eq!(body["detail"], "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        for (err, expected) in [
            (ApiError::validation("v"), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::bad_request("b"), StatusCode::BAD_REQUEST),
            (ApiError::forbidden("f"), StatusCode::FORBIDDEN),
            (ApiError::not_found("n"), StatusCode::NOT_FOUND),
        ] {
            let (status, auth, _) = body_of(err).await;
            assert_eq!(status, expected);
            assert!(auth.is_none());
        }
    }

    #[tokio::test]
    async fn test_server_errors_hide_internals() {
        let err = ApiError::from(DatabaseError::Orm {
            source: mcq_database::sea_orm::DbErr::Custom("secret table layout".into()),
            context: None,
        });
        let (status, _, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], INTERNAL_DETAIL);

        let err = ApiError::from(DatabaseError::Unavailable { message: "down".into(), context: None });
        let (status, _, body) = body_of(err).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["detail"], UNAVAILABLE_DETAIL);
    }
}
