use derive_more::Display;

/// Page used when the caller doesn't ask for one
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when the caller doesn't ask for one
pub const DEFAULT_LIMIT: u64 = 20;
/// Largest page size the list operation will hand out
pub const MAX_LIMIT: u64 = 100;

/// A normalized page/limit window over the todo collection. Page numbers start at 1.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("page {page} (limit {limit})")]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Builds a window from raw caller input. Missing or zero values fall back to the
    /// defaults and the limit is capped at [MAX_LIMIT].
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        PageRequest { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of records to skip before this page starts
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
