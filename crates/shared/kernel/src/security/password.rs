use std::borrow::Cow;

#[mcq_derive::mcq_error]
pub enum PasswordError {
    #[error("Password hashing error{}: {source}", format_context(.context))]
    Hash { source: bcrypt::BcryptError, context: Option<Cow<'static, str>> },

    #[error("Password worker error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// bcrypt hashing on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// # Errors
    /// [`PasswordError::Hash`] for an invalid cost.
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| PasswordError::Internal { message: e.to_string().into(), context: None })?
            .context("Hashing password")
    }

    /// `false` for a wrong password and for hashes bcrypt cannot parse.
    pub async fn verify(&self, password: &str, hashed: &str) -> bool {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed).unwrap_or(false))
            .await
            .unwrap_or(false)
    }
}
