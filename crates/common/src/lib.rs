//! T&C Guard Common Library
//!
//! Shared code for the T&C Guard services including:
//! - Database models and the generic repository pattern
//! - Uniform API response envelope builders
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod responses;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{BaseRepository, MongoDb, Page, PageQuery};
pub use errors::{AppError, Result};
pub use responses::{ResponseCode, TncResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default page size for filtered queries
pub const DEFAULT_PAGE_SIZE: i64 = 100;
