//! Results feature slice: scores answer sheets and serves stored results.

mod error;
mod handlers;
pub mod models;
mod repository;
pub mod scoring;
mod service;

pub use crate::error::{ResultsError, ResultsErrorExt};
pub use crate::repository::ResultRepository;
pub use crate::service::ResultsService;

use mcq_database::Database;
use mcq_kernel::domain::config::ApiConfig;
use mcq_kernel::domain::registry::InitializedSlice;
use mcq_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[mcq_derive::mcq_slice("results")]
pub struct Results {
    pub service: ResultsService,
}

/// Initialize the results feature.
pub fn init(config: &ApiConfig, database: &Database) -> InitializedSlice {
    let service =
        ResultsService::new(ResultRepository::new(database.clone()), config.quiz.max_answers_per_submission);
    tracing::info!("Results slice initialized");
    InitializedSlice::new(Results::new(ResultsInner { service }))
}

/// `/results` routes and `POST /test-papers/{id}/submit`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::submit_result))
        .routes(routes!(handlers::submit_test_paper))
        .routes(routes!(handlers::my_results))
        .routes(routes!(handlers::user_results))
        .routes(routes!(handlers::paper_results))
        .routes(routes!(handlers::get_result, handlers::delete_result))
}
