use serde::Serialize;

/// A normalized page request.
///
/// A `limit` of zero disables pagination: every record is returned and the
/// offset is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Builds a request from raw query values.
    ///
    /// Non-positive pages become page 1 and non-positive limits disable
    /// pagination.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: u64::try_from(page).ok().filter(|p| *p > 0).unwrap_or(1),
            limit: u64::try_from(limit).unwrap_or(0),
        }
    }

    /// Requests every record in a single page.
    pub fn all() -> Self {
        Self { page: 1, limit: 0 }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// The page size, or `None` when pagination is disabled.
    pub fn limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }

    pub fn offset(&self) -> u64 {
        match self.limit() {
            Some(limit) => (self.page - 1).saturating_mul(limit),
            None => 0,
        }
    }

    /// Number of pages needed to show `total` records.
    pub fn pages(&self, total: u64) -> u64 {
        match self.limit() {
            Some(limit) => total.div_ceil(limit),
            None => 1,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_page_defaults_to_first() {
        assert_eq!(PageRequest::new(0, 10).page(), 1);
        assert_eq!(PageRequest::new(-3, 10).page(), 1);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn offset_and_pages() {
        let request = PageRequest::new(2, 10);
        assert_eq!(request.offset(), 10);
        assert_eq!(request.limit(), Some(10));
        assert_eq!(request.pages(25), 3);
        assert_eq!(request.pages(20), 2);
        assert_eq!(request.pages(0), 0);
    }

    #[test]
    fn zero_limit_disables_pagination() {
        let request = PageRequest::new(4, 0);
        assert_eq!(request.limit(), None);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.pages(25), 1);
    }

    #[test]
    fn negative_limit_disables_pagination() {
        let request = PageRequest::new(2, -5);
        assert_eq!(request.limit(), None);
        assert_eq!(request.offset(), 0);
        assert_eq!(request, PageRequest::new(2, 0));
    }
}
