//! Error handling for the Warden API server.

mod response;
mod types;

pub use types::{ApiError, ApiResult};
