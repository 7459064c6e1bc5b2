//! Response types for the Warden API server.

pub mod pagination;

pub use pagination::{PaginatedResponse, PaginationMeta, PaginationParams};
