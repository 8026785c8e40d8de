//! Test paper feature slice under `/test-papers`.

mod error;
mod handlers;
pub mod models;
mod repository;
mod service;

pub use crate::error::{TestPaperError, TestPaperErrorExt};
pub use crate::repository::TestPaperRepository;
pub use crate::service::TestPaperService;

use mcq_database::Database;
use mcq_kernel::domain::config::ApiConfig;
use mcq_kernel::domain::registry::InitializedSlice;
use mcq_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[mcq_derive::mcq_slice("test_papers")]
pub struct TestPapers {
    pub service: TestPaperService,
}

/// Initialize the test paper feature.
pub fn init(config: &ApiConfig, database: &Database) -> InitializedSlice {
    let service = TestPaperService::new(
        TestPaperRepository::new(database.clone()),
        config.quiz.default_duration_minutes,
    );
    tracing::info!("Test papers slice initialized");
    InitializedSlice::new(TestPapers::new(TestPapersInner { service }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_test_paper, handlers::list_test_papers))
        .routes(routes!(
            handlers::get_test_paper,
            handlers::update_test_paper,
            handlers::delete_test_paper
        ))
}
