//! Request and response bodies of the `/auth` routes.

use crate::error::IdentityError;
use chrono::{DateTime, NaiveDate, Utc};
use mcq_database::entities::{Role, user};
use mcq_derive::api_model;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Self-registration of a `USER` account.
#[api_model]
pub struct UserCreate {
    /// 2 to 100 characters
    pub email: String,
    /// At least 6 characters
    pub password: String,
    pub full_name: Option<String>,
}

/// Registration of an `ADMIN` account guarded by the shared admin secret.
#[api_model]
pub struct AdminCreate {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub admin_secret: String,
}

/// Account created by an admin on behalf of a user.
#[api_model]
pub struct AdminCreateUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// OAuth2 password form; the username is the email.
#[api_model(deny_unknown_fields = false)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[api_model]
pub struct UserUpdate {
    pub full_name: String,
    pub phone_number: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
}

#[api_model]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[api_model]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    #[schema(value_type = String, example = "USER")]
    pub role: Role,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
}

#[api_model]
pub struct UserUpdateResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    #[schema(value_type = String, example = "USER")]
    pub role: Role,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            full_name: user.full_name,
            phone_number: user.phone_number,
            date_of_birth: user.date_of_birth.map(format_date),
        }
    }
}

impl From<user::Model> for UserUpdateResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.unwrap_or_default(),
            email: user.email,
            phone_number: user.phone_number.unwrap_or_default(),
            date_of_birth: user.date_of_birth.map(format_date).unwrap_or_default(),
            role: user.role,
        }
    }
}

fn format_date(value: DateTime<Utc>) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD` into midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, IdentityError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| IdentityError::validation("Invalid date format, use YYYY-MM-DD"))
}

/// One `@`, a non-empty local part and a dotted domain.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn check_len(field: &str, value: &str, min: usize, max: Option<usize>) -> Result<(), IdentityError> {
    let len = value.chars().count();
    let too_long = max.is_some_and(|max| len > max);
    if len < min || too_long {
        let bound = max.map_or_else(|| format!("at least {min}"), |max| format!("between {min} and {max}"));
        return Err(IdentityError::validation(format!("{field} must be {bound} characters long")));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), IdentityError> {
    check_len("email", email, 2, Some(100))?;
    if !is_valid_email(email) {
        return Err(IdentityError::validation("email is not a valid email address"));
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), IdentityError> {
    check_len("password", password, 6, None)
}

fn check_full_name(full_name: &str) -> Result<(), IdentityError> {
    check_len("full_name", full_name, 2, Some(100))
}

impl UserCreate {
    pub(crate) fn validate(&self) -> Result<(), IdentityError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        self.full_name.as_deref().map_or(Ok(()), |name| check_len("full_name", name, 0, Some(100)))
    }
}

impl AdminCreate {
    pub(crate) fn validate(&self) -> Result<(), IdentityError> {
        check_full_name(&self.full_name)?;
        check_email(&self.email)?;
        check_password(&self.password)
    }
}

impl AdminCreateUser {
    pub(crate) fn validate(&self) -> Result<(), IdentityError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        check_full_name(&self.full_name)
    }
}

impl UserUpdate {
    /// Validates the fields and parses the birth date.
    pub(crate) fn validate(&self) -> Result<DateTime<Utc>, IdentityError> {
        check_full_name(&self.full_name)?;
        check_len("phone_number", &self.phone_number, 10, Some(15))?;
        parse_date(&self.date_of_birth)
    }
}
