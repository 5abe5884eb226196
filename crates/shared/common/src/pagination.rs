//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Page number, never below 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Offset for the database query
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        Self {
            items,
            meta: PaginationMeta {
                page: params.page(),
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }
}
