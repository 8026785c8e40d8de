//! Access tokens, password hashing and the request extractors guarding handlers.

mod extractor;
mod password;
mod token;

pub use extractor::{AdminUser, CurrentUser, bearer_token};
pub use password::{PasswordError, PasswordErrorExt, PasswordHasher};
pub use token::{Claims, TokenError, TokenErrorExt, TokenService};
