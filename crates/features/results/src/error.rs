use mcq_database::DatabaseError;
use mcq_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`ResultsError`] enum of this crate.
#[mcq_derive::mcq_error]
pub enum ResultsError {
    #[status(404)]
    #[error("Result not found")]
    NotFound { id: i32 },

    #[status(404)]
    #[error("Test paper not found")]
    PaperNotFound { test_paper_id: i32 },

    #[status(400)]
    #[error("Test paper has no questions")]
    EmptyPaper { test_paper_id: i32 },

    /// The submitting user vanished between authentication and the insert.
    #[status(404)]
    #[error("User or test paper not found")]
    MissingReference { user_id: i32, test_paper_id: i32 },

    #[status(403)]
    #[error("{message}")]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(422)]
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Results storage error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },
}

impl ResultsError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub(crate) fn forbidden(message: &'static str) -> Self {
        Self::Forbidden { message: message.into(), context: None }
    }
}

impl From<ResultsError> for ApiError {
    fn from(err: ResultsError) -> Self {
        match err {
            ResultsError::Database { source, .. } => source.into(),
            other => Self::from_status(other.status(), other.to_string()),
        }
    }
}
