//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Error translation into the HTTP response envelope
//! - The response envelope and pagination types
//! - Configuration structures
//! - The Redis cache (behind the `cache` feature)

#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod error;
pub mod pagination;
pub mod response;

#[cfg(feature = "cache")]
pub use cache::{Cache, LockGuard};
pub use config::*;
pub use error::{AppError, AppResult, ErrorCategory, OptionExt};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use response::{ApiErrorBody, ApiResponse, Created, NoContent};
