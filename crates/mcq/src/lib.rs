//! Facade crate for MCQ Platform features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] to build every feature slice, register them on the
//!   [`ApiState`](kernel::server::ApiState) and mount [`api_router`] next to the system routes.

use mcq_database::Database;
pub use mcq_domain as domain;
use mcq_domain::config::ApiConfig;
use mcq_domain::constants::API_PREFIX;
use mcq_domain::registry::InitializedSlice;
pub use mcq_kernel as kernel;
use mcq_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;

pub mod server {
    pub mod router {
        pub use mcq_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use mcq_identity as identity;
    pub use mcq_questions as questions;
    pub use mcq_results as results;
    pub use mcq_test_papers as test_papers;

    /// Slices registered by [`init`](crate::init), in registration order.
    pub const ENABLED: &[&str] = &["identity", "test_papers", "questions", "results"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all features.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::with_capacity(features::ENABLED.len());

    // Accounts & authentication
    slices.push(features::identity::init(config, database)?);

    // Quiz content
    slices.push(features::test_papers::init(config, database));
    slices.push(features::questions::init(config, database));

    // Submissions & scoring
    slices.push(features::results::init(config, database));

    Ok(slices)
}

/// Routes of every feature under [`API_PREFIX`].
pub fn api_router() -> OpenApiRouter<ApiState> {
    let features = OpenApiRouter::new()
        .merge(features::identity::router())
        .merge(features::test_papers::router())
        .merge(features::questions::router())
        .merge(features::results::router());

    OpenApiRouter::new().nest(API_PREFIX, features)
}
