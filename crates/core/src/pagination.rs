//! Page-number pagination shared by every list endpoint.
//!
//! Pages are 1-indexed. A request is normalised once into a [`PageRequest`]
//! and the response carries a [`Pagination`] block computed from the exact
//! row total.

use serde::Serialize;

/// First page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when a collection does not specify its own.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page size any caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A normalised page request: `page >= 1`, `1 <= limit <= MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Normalise raw `page` / `limit` values.
    ///
    /// Missing values fall back to page 1 and `default_limit`. Values below
    /// the minimum are clamped up rather than rejected.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(DEFAULT_PAGE),
            limit: clamp_limit(limit, default_limit, MAX_PAGE_LIMIT),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_PAGE_LIMIT)
    }
}

/// The `pagination` block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total_pages(total, request.limit),
        }
    }

    /// Pagination for a page known to hold nothing.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(request, 0)
    }
}

/// `ceil(total / limit)`, or 0 when `limit` is not positive.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
