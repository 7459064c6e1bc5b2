//! Pagination support for list endpoints.

use serde::{Deserialize, Serialize};

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// List of items.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Total number of items.
    pub total: u64,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Create a paginated response.
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            data,
            pagination: PaginationMeta {
                total,
                page,
                limit,
                total_pages,
            },
        }
    }
}

/// Pagination request parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// Requested page, 1-indexed.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Requested page size.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl PaginationParams {
    /// Get the offset for database queries.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) as i64 - 1) * self.limit() as i64
    }

    /// Get the limit, at least one row and capped at maximum.
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, 100)
    }
}
