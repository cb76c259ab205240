//! Pagination query parameters

use serde::Deserialize;
use thiserror::Error;

/// Default page size for profile dataset listings.
pub const DEFAULT_PER_PAGE: i64 = 5;

/// Upper bound on page size.
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page must be greater than 0")]
    InvalidPage,

    #[error("Per-page must be between 1 and {MAX_PER_PAGE}")]
    InvalidPerPage,
}

/// Page parameters accepted on list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Resolve to concrete `(page, per_page)` values, validating bounds.
    pub fn resolve(&self) -> Result<(i64, i64), PaginationError> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(PaginationError::InvalidPerPage);
        }

        Ok((page, per_page))
    }

    /// SQL OFFSET for the resolved page.
    pub fn offset(page: i64, per_page: i64) -> i64 {
        (page - 1) * per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams {
            page: None,
            per_page: None,
        };
        assert_eq!(params.resolve().unwrap(), (1, DEFAULT_PER_PAGE));
    }

    #[test]
    fn test_rejects_bad_values() {
        let params = PaginationParams {
            page: Some(0),
            per_page: None,
        };
        assert_eq!(params.resolve(), Err(PaginationError::InvalidPage));

        let params = PaginationParams {
            page: Some(1),
            per_page: Some(101),
        };
        assert_eq!(params.resolve(), Err(PaginationError::InvalidPerPage));
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationParams::offset(1, 5), 0);
        assert_eq!(PaginationParams::offset(3, 5), 10);
    }
}
