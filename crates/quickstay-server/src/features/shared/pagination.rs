//! Shared pagination utilities
//!
//! List endpoints page with `limit`/`offset` and report the total count of
//! matching rows alongside the page.
//!
//! # Examples
//!
//! ```rust,ignore
//! use quickstay_server::features::shared::pagination::{Paginated, PaginationMetadata};
//!
//! let page = Paginated::new(items, PaginationMetadata::new(total, 10, 20));
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata for list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    /// Rows matching the filters, ignoring limit/offset
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    /// `total > offset + limit`
    pub has_more: bool,
}

impl PaginationMetadata {
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: total > offset.saturating_add(limit),
        }
    }
}

/// A page of items plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: PaginationMetadata) -> Self {
        Self { items, pagination }
    }
}
