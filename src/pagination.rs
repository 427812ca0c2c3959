//! Pagination details returned alongside list responses.
//!
//! The API reports where a page sits in the full result set. The client
//! decodes this block but never follows it; fetching another page is a new
//! call with a different `page` filter.

use serde::{Deserialize, Serialize};

/// The `pagination` block of a list response.
///
/// # Examples
///
/// ```
/// use affise::Pagination;
///
/// let page: Pagination =
///     serde_json::from_str(r#"{"per_page":20,"total_count":45,"page":2,"next_page":3}"#).unwrap();
/// assert!(page.has_next());
/// assert_eq!(page.last_page(), Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Items per page.
    #[serde(default)]
    pub per_page: Option<u64>,

    /// Items across all pages.
    #[serde(default)]
    pub total_count: Option<u64>,

    /// Current page, starting at 1.
    #[serde(default)]
    pub page: Option<u64>,

    /// Next page, absent on the last one.
    #[serde(default)]
    pub next_page: Option<u64>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    /// Number of the final page, when the totals are known.
    pub fn last_page(&self) -> Option<u64> {
        let per_page = self.per_page.filter(|&n| n > 0)?;
        let total = self.total_count?;
        Some(total.div_ceil(per_page).max(1))
    }
}
