//! Root greeting and the two database connectivity probes.

use super::{ApiError, ApiResult, ApiState};
use axum::Json;
use axum::extract::State;
use mcq_database::DatabaseError;
use mcq_derive::{api_handler, api_model};
use mcq_domain::constants::SYSTEM_TAG;
use tracing::warn;

#[api_model]
pub(super) struct WelcomeResponse {
    message: &'static str,
}

#[api_model]
/// Successful connectivity probe
pub(super) struct ProbeResponse {
    message: &'static str,
    status: &'static str,
    /// `direct` or `session`
    probe: &'static str,
}

impl ProbeResponse {
    const fn ok(probe: &'static str) -> Self {
        Self { message: "Database connection successful", status: "ok", probe }
    }
}

/// Probe failures always answer 500 with the failure reason as `detail`.
fn probe_failed(probe: &'static str, err: &DatabaseError) -> ApiError {
    warn!(probe, error = %err, "Database probe failed");
    ApiError::Internal { message: err.to_string().into(), context: None }
}

#[api_handler(
    get,
    path = "/",
    responses((status = OK, description = "Welcome message", body = WelcomeResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse { message: "Welcome to MCQ Platform API" })
}

#[api_handler(
    get,
    path = "/db-test",
    responses(
        (status = OK, description = "A fresh driver connection answered SELECT 1", body = ProbeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Connection failed or unexpected result", body = super::error::ErrorBody),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn db_test_handler(State(state): State<ApiState>) -> ApiResult<Json<ProbeResponse>> {
    state.database.probe_direct().await.map_err(|e| probe_failed("direct", &e))?;
    Ok(Json(ProbeResponse::ok("direct")))
}

#[api_handler(
    get,
    path = "/db-test-session",
    responses(
        (status = OK, description = "A pooled ORM session answered SELECT 1", body = ProbeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Connection failed or unexpected result", body = super::error::ErrorBody),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn db_test_session_handler(
    State(state): State<ApiState>,
) -> ApiResult<Json<ProbeResponse>> {
    state.database.probe_session().await.map_err(|e| probe_failed("session", &e))?;
    Ok(Json(ProbeResponse::ok("session")))
}
