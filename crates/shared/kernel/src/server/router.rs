use super::{ApiState, health, system};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes mounted at the root: greeting, health and the database probes.
pub fn system_router() -> OpenApiRouter<ApiState> {
    health::mark_start();

    OpenApiRouter::new()
        .routes(routes!(system::root_handler))
        .routes(routes!(health::health_handler))
        .routes(routes!(system::db_test_handler))
        .routes(routes!(system::db_test_session_handler))
}
