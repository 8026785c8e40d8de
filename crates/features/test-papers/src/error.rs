use mcq_database::DatabaseError;
use mcq_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`TestPaperError`] enum of this crate.
#[mcq_derive::mcq_error]
pub enum TestPaperError {
    #[status(404)]
    #[error("Test paper not found")]
    NotFound { id: i32 },

    #[status(422)]
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Test paper storage error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },
}

impl TestPaperError {
    pub(crate) fn validation(message: &'static str) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

impl From<TestPaperError> for ApiError {
    fn from(err: TestPaperError) -> Self {
        match err {
            TestPaperError::Database { source, .. } => source.into(),
            other => Self::from_status(other.status(), other.to_string()),
        }
    }
}
