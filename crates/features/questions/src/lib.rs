//! Question bank feature slice under `/questions`.
//!
//! Options are stored as a JSON array of `{"text": ...}` objects next to the 0-based
//! `correct_option_index`; responses number the options from 1.

mod error;
mod handlers;
pub mod models;
mod repository;
mod service;

pub use crate::error::{QuestionError, QuestionErrorExt};
pub use crate::repository::QuestionRepository;
pub use crate::service::QuestionService;

use mcq_database::Database;
use mcq_kernel::domain::config::ApiConfig;
use mcq_kernel::domain::registry::InitializedSlice;
use mcq_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[mcq_derive::mcq_slice("questions")]
pub struct Questions {
    pub service: QuestionService,
}

/// Initialize the question bank feature.
pub fn init(config: &ApiConfig, database: &Database) -> InitializedSlice {
    let service = QuestionService::new(
        QuestionRepository::new(database.clone()),
        config.quiz.min_options,
        config.quiz.default_max_score,
    );
    tracing::info!(min_options = config.quiz.min_options, "Questions slice initialized");
    InitializedSlice::new(Questions::new(QuestionsInner { service }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_question, handlers::list_questions))
        .routes(routes!(handlers::get_question, handlers::update_question, handlers::delete_question))
}
