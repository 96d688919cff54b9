//! Page metadata and navigation bounds.

use serde::{Deserialize, Serialize};

use crate::models::PatientPage;

/// Where the listing currently sits among its pages.
///
/// Always rebuilt from a fresh total; never patched incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn new(total: usize, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as usize) as u32
        };
        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }

    /// Metadata for a page result, taken verbatim.
    pub fn from_page(page: &PatientPage) -> Self {
        Self::new(page.total, page.page, page.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Target of a "previous" click, or `None` when the button is disabled.
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    /// Target of a "next" click, or `None` when the button is disabled.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// Pager caption, e.g. `Page 2 of 3 (25 patients)`.
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} ({} patients)",
            self.page, self.total_pages, self.total
        )
    }
}
