use std::borrow::Cow;

/// A specialized [`DatabaseError`] enum of this crate.
#[mcq_derive::mcq_error]
pub enum DatabaseError {
    /// Invalid builder input.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The server runs without a usable database (bad URL or unreachable host).
    #[status(503)]
    #[error("Database unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Opening a connection or running the probe query failed.
    #[status(503)]
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// `SELECT 1` answered with something else.
    #[error("Database query returned unexpected result")]
    UnexpectedResult { value: Option<i64> },

    /// A wrapper for ORM errors.
    #[error("Database error{}: {source}", format_context(.context))]
    Orm {
        #[source]
        source: sea_orm::DbErr,
        context: Option<Cow<'static, str>>,
    },

    /// A wrapper for driver-level errors.
    #[error("Driver error{}: {source}", format_context(.context))]
    Driver {
        #[source]
        source: sqlx::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Migration failures or checksum drift.
    #[error("Migration error{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal database error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DatabaseError {
    /// Classifies an ORM error, turning connectivity failures into [`DatabaseError::Unavailable`].
    #[must_use]
    pub fn from_orm(err: sea_orm::DbErr, context: impl Into<Cow<'static, str>>) -> Self {
        if is_connectivity_error(&err) {
            Self::Unavailable { message: err.to_string().into(), context: Some(context.into()) }
        } else {
            Self::Orm { source: err, context: Some(context.into()) }
        }
    }
}

/// Returns `true` when the error means the database cannot be reached, as opposed to a
/// failing statement.
#[must_use]
pub fn is_connectivity_error(err: &sea_orm::DbErr) -> bool {
    use sea_orm::{DbErr, RuntimeErr};

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => matches!(
            e,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        ),
        _ => false,
    }
}
