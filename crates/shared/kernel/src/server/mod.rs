//! HTTP plumbing shared by every slice.

mod error;
mod extract;
mod health;
pub mod router;
mod state;
mod system;

pub use error::{ApiError, ApiErrorExt, ApiResult, ErrorBody};
pub use extract::{ApiForm, ApiJson, ApiPath, ApiQuery, Slice};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
