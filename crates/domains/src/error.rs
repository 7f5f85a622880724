//! # DomainError
//!
//! Centralized error handling for the forum display layer.
//! Maps rendering and pagination failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Markup mode other than `bbcode` / `markdown`
    #[error("invalid markup property: {0}")]
    InvalidMarkup(String),

    /// Requested page is outside `1..=num_pages` (HTTP 404 at the web layer)
    #[error("page {page} not found ({num_pages} pages available)")]
    PageNotFound { page: i64, num_pages: u64 },

    /// Paginator was asked for pages of zero items
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// Emoticon table could not be compiled into a matcher
    #[error("invalid emoticon table: {0}")]
    EmoticonTable(String),

    /// Release level letter not one of `a`, `b`, `rc`, `f`
    #[error("unknown release level: {0}")]
    InvalidReleaseLevel(String),

    /// The backing item source failed (e.g., DB down)
    #[error("item source error: {0}")]
    Source(String),
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        DomainError::Source(format!("{err:#}"))
    }
}

/// A specialized Result type for forum display logic.
pub type Result<T> = std::result::Result<T, DomainError>;
