//! Pagination parameters for list endpoints
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

use serde::{Deserialize, Serialize};

/// Largest page size a client may request
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamps to sane values: page 0 becomes 1, per_page is kept in 1..=100
    pub fn normalize(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> i64 {
        let p = self.normalize();
        (p.page as i64 - 1) * p.per_page as i64
    }

    /// Row limit for this page
    pub fn limit(&self) -> i64 {
        self.normalize().per_page as i64
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
