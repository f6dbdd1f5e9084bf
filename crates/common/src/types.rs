use serde::{Deserialize, Serialize};

/// One page of a filtered result set, paired with the total number of
/// records matching the filters independent of paging.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Maps the items of the page, keeping page, limit and total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            limit: self.limit,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Pagination parameters. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Both bounds must be at least 1 for the offset computation to hold.
    pub fn is_valid(&self) -> bool {
        self.page >= 1 && self.limit >= 1
    }

    /// Number of records skipped before this page: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
