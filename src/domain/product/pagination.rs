//! Pagination parameters and results for product listings

use super::entity::Product;
use crate::domain::DomainError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    page: u32,
    limit: u32,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::validation("Page must be greater than 0"));
        }

        if limit == 0 || limit > MAX_LIMIT {
            return Err(DomainError::validation(format!(
                "Limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of products together with the total row count
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PaginationParams::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PaginationParams::new(3, 25).unwrap().offset(), 50);
        assert_eq!(PaginationParams::default().offset(), 0);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(PaginationParams::new(0, 10).is_err());
        assert!(PaginationParams::new(1, 0).is_err());
        assert!(PaginationParams::new(1, MAX_LIMIT + 1).is_err());
        assert!(PaginationParams::new(1, MAX_LIMIT).is_ok());
    }

    #[test]
    fn test_offset_never_underflows() {
        let params = PaginationParams { page: 0, limit: 10 };
        assert_eq!(params.offset(), 0);
    }
}
