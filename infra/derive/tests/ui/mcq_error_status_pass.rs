use mcq_derive::mcq_error;
use std::borrow::Cow;

#[mcq_error]
pub enum PaperError {
    #[status(404)]
    #[error("Test paper {id} not found")]
    NotFound { id: i32 },

    #[status(422)]
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = PaperError::NotFound { id: 1 };
    assert_eq!(err.status(), 404);
}
