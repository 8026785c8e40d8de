//! Axum extractors whose rejections render as [`ApiError`].

use super::{ApiError, ApiState};
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use mcq_domain::registry::FeatureSlice;

/// Body rejections are 400 for malformed syntax and 422 for everything else.
fn rejection(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::BAD_REQUEST {
        ApiError::bad_request(message)
    } else {
        ApiError::validation(message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        rejection(err.status(), err.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(err: FormRejection) -> Self {
        rejection(err.status(), err.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        ApiError::validation(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::validation(err.body_text())
    }
}

macro_rules! body_extractor {
    ($(#[$meta:meta])* $name:ident => $inner:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name<T>(pub T);

        impl<T, S> FromRequest<S> for $name<T>
        where
            axum::$inner<T>: FromRequest<S>,
            ApiError: From<<axum::$inner<T> as FromRequest<S>>::Rejection>,
            S: Send + Sync,
        {
            type Rejection = ApiError;

            async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
                let axum::$inner(value) = axum::$inner::<T>::from_request(req, state).await?;
                Ok(Self(value))
            }
        }
    };
}

macro_rules! parts_extractor {
    ($(#[$meta:meta])* $name:ident => $inner:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name<T>(pub T);

        impl<T, S> FromRequestParts<S> for $name<T>
        where
            $inner: FromRequestParts<S>,
            ApiError: From<<$inner as FromRequestParts<S>>::Rejection>,
            S: Send + Sync,
        {
            type Rejection = ApiError;

            async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
                let value = <$inner>::from_request_parts(parts, state).await?;
                Ok(Self(value.0))
            }
        }
    };
}

body_extractor!(
    /// JSON request body.
    ApiJson => Json
);
body_extractor!(
    /// `application/x-www-form-urlencoded` request body.
    ApiForm => Form
);
parts_extractor!(
    /// Path parameters.
    ApiPath => axum::extract::Path<T>
);
parts_extractor!(
    /// Query string.
    ApiQuery => axum::extract::Query<T>
);

/// A registered feature slice, cloned out of [`ApiState`].
#[derive(Debug, Clone)]
pub struct Slice<T>(pub T);

impl<T> FromRequestParts<ApiState> for Slice<T>
where
    T: FeatureSlice + Clone,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        state
            .try_get_slice::<T>()
            .cloned()
            .map(Self)
            .map_err(|e| ApiError::Internal { message: e.to_string().into(), context: None })
    }
}
