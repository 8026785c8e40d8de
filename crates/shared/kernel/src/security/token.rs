use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mcq_database::entities::user;
use mcq_domain::config::JwtConfig;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[mcq_derive::mcq_error]
pub enum TokenError {
    #[error("Token configuration error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(401)]
    #[error("Invalid authentication credentials")]
    Invalid {
        #[source]
        source: jsonwebtoken::errors::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Token encoding error{}: {message}", format_context(.context))]
    Encode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Numeric user id, `None` when `sub` is not a positive integer.
    #[must_use]
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse::<i32>().ok().filter(|id| *id > 0)
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HMAC-signed access tokens. Cloning is cheap.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    algorithm: Algorithm,
    expire_minutes: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("expire_minutes", &self.expire_minutes)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// # Errors
    /// [`TokenError::Config`] for an empty secret, a non-HMAC algorithm or a zero lifetime.
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Config { message: "secret must not be empty".into(), context: None });
        }
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| TokenError::Config {
            message: format!("unknown algorithm '{}'", config.algorithm).into(),
            context: None,
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::Config {
                message: format!("{algorithm:?} is not an HMAC algorithm").into(),
                context: None,
            });
        }
        let expire_minutes = i64::try_from(config.expire_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(TokenError::Config { message: "expire_minutes out of range".into(), context: None })?;

        let secret = config.secret.as_bytes();
        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            algorithm,
            expire_minutes,
        })
    }

    /// Signs a token for `user` valid for the configured lifetime.
    ///
    /// # Errors
    /// [`TokenError::Encode`] if signing fails.
    pub fn issue(&self, user: &user::Model) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
            iat: now,
            exp: now + self.expire_minutes * 60,
        };
        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encode { message: e.to_string().into(), context: None })
    }

    /// Checks signature, algorithm and expiry.
    ///
    /// # Errors
    /// [`TokenError::Invalid`] for any malformed, forged or expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }

    #[must_use]
    pub const fn expire_minutes(&self) -> i64 {
        self.expire_minutes
    }
}
