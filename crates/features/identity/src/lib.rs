//! Identity feature slice: accounts, bcrypt passwords and JWT login under `/auth`.

mod error;
mod handlers;
pub mod models;
mod repository;
mod service;

pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::repository::UserRepository;
pub use crate::service::IdentityService;

use mcq_database::Database;
use mcq_kernel::domain::config::ApiConfig;
use mcq_kernel::domain::registry::InitializedSlice;
use mcq_kernel::security::{PasswordHasher, TokenService};
use mcq_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Identity feature state
#[mcq_derive::mcq_slice("identity")]
pub struct Identity {
    pub service: IdentityService,
}

/// Initialize the identity feature.
///
/// # Errors
/// [`IdentityError::Token`] when the JWT settings are unusable.
pub fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, IdentityError> {
    let tokens = TokenService::new(&config.security.jwt).context("Building token service")?;
    let passwords = PasswordHasher::new(config.security.bcrypt_cost);
    let service = IdentityService::new(
        UserRepository::new(database.clone()),
        tokens,
        passwords,
        config.security.admin_secret.as_str(),
    );

    tracing::info!("Identity slice initialized");

    Ok(InitializedSlice::new(Identity::new(IdentityInner { service })))
}

/// `/auth` routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::register))
        .routes(routes!(handlers::login))
        .routes(routes!(handlers::me))
        .routes(routes!(handlers::register_admin))
        .routes(routes!(handlers::admin_me))
        .routes(routes!(handlers::get_user, handlers::update_user))
        .routes(routes!(handlers::create_user))
}
