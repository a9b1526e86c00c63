//! Pagination envelope for list endpoints.

use serde::{Deserialize, Serialize};

/// Query parameters of a paginated request; both fields are optional on the
/// wire and fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "PageRequest::first_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "PageRequest::default_per_page")]
    pub per_page: u32,
}

impl PageRequest {
    fn first_page() -> u32 {
        1
    }

    fn default_per_page() -> u32 {
        20
    }

    /// Row offset for the database query; page 0 is treated as page 1.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Row limit for the database query.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::first_page(),
            per_page: Self::default_per_page(),
        }
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PageMeta {
    /// Metadata for a request against `total` matching items.
    #[must_use]
    pub fn new(request: &PageRequest, total: u64) -> Self {
        let per_page = u64::from(request.per_page.max(1));
        let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 20, 0)]
    #[case(2, 20, 20)]
    #[case(3, 10, 20)]
    #[case(0, 20, 0)]
    fn test_offset(#[case] page: u32, #[case] per_page: u32, #[case] expected: u64) {
        let request = PageRequest { page, per_page };
        assert_eq!(request.offset(), expected);
    }

    #[test]
    fn test_page_meta_rounds_up() {
        let request = PageRequest {
            page: 1,
            per_page: 10,
        };
        let meta = PageMeta::new(&request, 21);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = PageMeta::new(&PageRequest::default(), 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.total, 0);
    }

    #[test]
    fn test_missing_params_fall_back_to_defaults() {
        let request: PageRequest = serde_json::from_str("{}").expect("should deserialize");
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }
}
