//! Page metadata reported alongside a page of results.

use serde::{Deserialize, Serialize};

use crate::request::PageRequest;

/// Summary of where a page sits within the full collection.
///
/// Serialises as `{"size":…,"totalElements":…,"totalPages":…,"number":…}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Requested page size.
    pub size: u32,
    /// Number of elements in the whole collection.
    pub total_elements: u64,
    /// Number of pages needed to hold every element.
    pub total_pages: u64,
    /// Zero-based index of this page.
    pub number: u32,
}

impl PageMetadata {
    /// Describe the page addressed by `request` in a collection of
    /// `total_elements`.
    #[must_use]
    pub fn new(request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size();
        Self {
            size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(size.max(1))),
            number: request.page(),
        }
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Whether a page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.number as u64) + 1 < self.total_pages
    }

    /// Index of the final page, or zero for an empty collection.
    #[must_use]
    pub fn last_page(&self) -> u32 {
        u32::try_from(self.total_pages.saturating_sub(1)).unwrap_or(u32::MAX)
    }
}
