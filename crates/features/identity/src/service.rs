use crate::error::IdentityError;
use crate::models::{AdminCreate, AdminCreateUser, TokenResponse, UserCreate, UserUpdate};
use crate::repository::{NewUser, Profile, UserRepository, Write};
use mcq_database::entities::{Role, user};
use mcq_domain::constants::TOKEN_TYPE;
use mcq_kernel::security::{CurrentUser, PasswordHasher, TokenService};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const ACCESS_DENIED: &str = "Not authorized to access this user's data";
const UPDATE_DENIED: &str = "Not authorized to update this user's data";

/// Account and login operations.
#[derive(Debug, Clone)]
pub struct IdentityService {
    users: UserRepository,
    tokens: TokenService,
    passwords: PasswordHasher,
    admin_secret: Arc<str>,
}

impl IdentityService {
    #[must_use]
    pub fn new(
        users: UserRepository,
        tokens: TokenService,
        passwords: PasswordHasher,
        admin_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self { users, tokens, passwords, admin_secret: admin_secret.into() }
    }

    /// Creates an account unless the email is taken.
    async fn create(
        &self,
        email: String,
        password: &str,
        full_name: Option<String>,
        role: Role,
    ) -> Result<Option<user::Model>, IdentityError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(None);
        }
        let hashed_password = self.passwords.hash(password).await?;
        let created = self.users.insert(NewUser { email, hashed_password, full_name, role }).await?;
        match created {
            Write::Done(user) => {
                info!(user_id = user.id, role = user.role.as_str(), "User registered");
                Ok(Some(user))
            },
            Write::Duplicate => Ok(None),
        }
    }

    #[instrument(skip_all, fields(email = %body.email))]
    pub async fn register(&self, body: UserCreate) -> Result<user::Model, IdentityError> {
        body.validate()?;
        let email = body.email.clone();
        self.create(body.email, &body.password, body.full_name, Role::User)
            .await?
            .ok_or(IdentityError::EmailTaken { email })
    }

    #[instrument(skip_all, fields(email = %body.email))]
    pub async fn register_admin(&self, body: AdminCreate) -> Result<user::Model, IdentityError> {
        body.validate()?;
        if body.admin_secret != *self.admin_secret {
            warn!("Admin registration with a wrong admin secret");
            return Err(IdentityError::AdminRegistrationFailed { reason: "admin secret mismatch" });
        }
        self.create(body.email, &body.password, Some(body.full_name), Role::Admin)
            .await?
            .ok_or(IdentityError::AdminRegistrationFailed { reason: "email already registered" })
    }

    #[instrument(skip_all, fields(email = %body.email))]
    pub async fn create_user(&self, body: AdminCreateUser) -> Result<user::Model, IdentityError> {
        body.validate()?;
        let email = body.email.clone();
        self.create(body.email, &body.password, Some(body.full_name), Role::User)
            .await?
            .ok_or(IdentityError::UserCreationFailed { email })
    }

    /// Verifies the credentials and issues an access token.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, IdentityError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(IdentityError::InvalidCredentials {});
        };
        if !self.passwords.verify(password, &user.hashed_password).await {
            return Err(IdentityError::InvalidCredentials {});
        }

        let access_token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok(TokenResponse { access_token, token_type: TOKEN_TYPE.to_owned() })
    }

    /// Loads `user_id` for the caller, who must be that user or an admin.
    pub async fn get_user(&self, caller: &CurrentUser, user_id: i32) -> Result<user::Model, IdentityError> {
        if !caller.can_access(user_id) {
            return Err(IdentityError::forbidden(ACCESS_DENIED));
        }
        self.users.find_by_id(user_id).await?.ok_or(IdentityError::NotFound { id: user_id })
    }

    #[instrument(skip_all, fields(user_id = user_id))]
    pub async fn update_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
        body: UserUpdate,
    ) -> Result<user::Model, IdentityError> {
        if !caller.can_access(user_id) {
            return Err(IdentityError::forbidden(UPDATE_DENIED));
        }
        let date_of_birth = body.validate()?;
        let existing =
            self.users.find_by_id(user_id).await?.ok_or(IdentityError::NotFound { id: user_id })?;

        let phone_number = body.phone_number.trim().to_owned();
        if let Some(owner) = self.users.find_by_phone(&phone_number).await? {
            if owner.id != user_id {
                return Err(IdentityError::PhoneTaken { phone_number });
            }
        }

        let profile = Profile { full_name: body.full_name, phone_number: phone_number.clone(), date_of_birth };
        match self.users.update_profile(existing, profile).await? {
            Write::Done(user) => Ok(user),
            Write::Duplicate => Err(IdentityError::PhoneTaken { phone_number }),
        }
    }
}
