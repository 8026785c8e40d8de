//! Everything a feature slice usually needs in its handlers.

pub use crate::security::{AdminUser, CurrentUser};
pub use crate::server::{ApiError, ApiForm, ApiJson, ApiPath, ApiQuery, ApiResult, ApiState, Slice};
pub use mcq_database::entities::Role;
pub use mcq_domain::config::ApiConfig;
pub use mcq_domain::registry::InitializedSlice;
