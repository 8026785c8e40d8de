use mcq_database::DatabaseError;
use mcq_kernel::security::{PasswordError, TokenError};
use mcq_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[mcq_derive::mcq_error]
pub enum IdentityError {
    #[status(400)]
    #[error("Email already registered")]
    EmailTaken { email: String },

    #[status(400)]
    #[error("Phone number already registered")]
    PhoneTaken { phone_number: String },

    #[status(400)]
    #[error("Admin registration failed. Check email availability and admin secret.")]
    AdminRegistrationFailed { reason: &'static str },

    #[status(400)]
    #[error("Email already registered or user creation failed")]
    UserCreationFailed { email: String },

    #[status(401)]
    #[error("Incorrect email or password")]
    InvalidCredentials {},

    #[status(403)]
    #[error("{message}")]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(404)]
    #[error("User not found")]
    NotFound { id: i32 },

    #[status(422)]
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Identity storage error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Identity token error{}: {source}", format_context(.context))]
    Token {
        #[source]
        source: TokenError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Identity password error{}: {source}", format_context(.context))]
    Password {
        #[source]
        source: PasswordError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl IdentityError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub(crate) fn forbidden(message: &'static str) -> Self {
        Self::Forbidden { message: message.into(), context: None }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Database { source, .. } => source.into(),
            other => Self::from_status(other.status(), other.to_string()),
        }
    }
}
