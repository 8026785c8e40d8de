use mcq_database::DatabaseError;
use mcq_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`QuestionError`] enum of this crate.
#[mcq_derive::mcq_error]
pub enum QuestionError {
    #[status(404)]
    #[error("Question not found")]
    NotFound { id: i32 },

    #[status(404)]
    #[error("Test paper not found")]
    PaperNotFound { test_paper_id: i32 },

    #[status(422)]
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Question storage error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },
}

impl QuestionError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

impl From<QuestionError> for ApiError {
    fn from(err: QuestionError) -> Self {
        match err {
            QuestionError::Database { source, .. } => source.into(),
            other => Self::from_status(other.status(), other.to_string()),
        }
    }
}
