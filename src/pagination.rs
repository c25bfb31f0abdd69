//! This module defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
        }
    }
}

/// The optional paging parameters of a list request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of items per page.
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Resolve the request parameters against the configured defaults.
    ///
    /// Zero values are treated as absent so the offset arithmetic cannot
    /// underflow or divide by zero.
    pub fn resolve(&self, config: &PaginationConfig) -> (u64, u64) {
        let page = match self.page {
            Some(page) if page > 0 => page,
            _ => config.default_page,
        };
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => config.default_page_size,
        };

        (page, limit)
    }
}

/// The paging summary returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The total number of matching items before paging.
    pub total: u64,
    /// The 1-based page number that was returned.
    pub page: u64,
    /// The number of items per page.
    pub limit: u64,
    /// The total number of pages, `ceil(total / limit)`.
    pub total_pages: u64,
}

impl Pagination {
    /// Build the paging summary for a result set of `total` items.
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod pagination_tests {
    use super::{PageQuery, Pagination, PaginationConfig};

    #[test]
    fn computes_total_pages_with_remainder() {
        let pagination = Pagination::new(25, 1, 20);

        assert_eq!(pagination.total_pages, 2);
    }

    #[test]
    fn computes_total_pages_exact_fit() {
        let pagination = Pagination::new(40, 1, 20);

        assert_eq!(pagination.total_pages, 2);
    }

    #[test]
    fn empty_result_set_has_zero_pages() {
        let pagination = Pagination::new(0, 1, 20);

        assert_eq!(pagination.total_pages, 0);
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let config = PaginationConfig::default();

        let (page, limit) = PageQuery::default().resolve(&config);

        assert_eq!((page, limit), (1, 20));
    }

    #[test]
    fn resolve_treats_zero_as_absent() {
        let config = PaginationConfig::default();
        let query = PageQuery {
            page: Some(0),
            limit: Some(0),
        };

        let (page, limit) = query.resolve(&config);

        assert_eq!((page, limit), (1, 20));
    }

    #[test]
    fn resolve_uses_provided_values() {
        let config = PaginationConfig::default();
        let query = PageQuery {
            page: Some(3),
            limit: Some(50),
        };

        let (page, limit) = query.resolve(&config);

        assert_eq!((page, limit), (3, 50));
    }
}
