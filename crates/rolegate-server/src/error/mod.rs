//! Error handling for the Rolegate gateway.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult};
