//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, the shared [`server::ApiState`],
//! the HTTP error type, token and password handling and the system routes.
//!
//! ## Config loading
//! ```rust,ignore
//! use mcq_kernel::config::load_api_config;
//!
//! let cfg = load_api_config()?;
//! println!("listening on {}:{}", cfg.server.address, cfg.server.port);
//! ```
//!
//! ## Guarding a handler
//! ```rust,ignore
//! use mcq_kernel::security::{AdminUser, CurrentUser};
//!
//! async fn me(CurrentUser(user): CurrentUser) -> String {
//!     user.email
//! }
//! ```
pub mod config;
pub mod prelude;
pub mod security;
pub mod server;

pub use mcq_domain as domain;
