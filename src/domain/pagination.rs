//! Pagination rules for the listing.
//!
//! Responsibility:
//! - total page count from the pagination control text ("Page 1 of 12")
//! - page URL construction for pages 2..N

use super::constants::site::{PAGE_NUMBERING_BASE, PAGE_QUERY_PARAM};

/// Outcome of reading the pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCount {
    /// Parsed from the token following "of"
    Detected(u32),
    /// Control missing or unparseable; treated as a single page
    Fallback,
}

impl PageCount {
    /// Parse the control's whitespace-joined text. The token after the
    /// literal `of` is the total; anything else falls back to one page.
    pub fn from_control_text(text: &str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        tokens
            .iter()
            .position(|token| *token == "of")
            .and_then(|idx| tokens.get(idx + 1))
            .and_then(|token| token.parse::<u32>().ok())
            .filter(|total| *total >= PAGE_NUMBERING_BASE)
            .map_or(PageCount::Fallback, PageCount::Detected)
    }

    pub fn total(self) -> u32 {
        match self {
            PageCount::Detected(total) => total,
            PageCount::Fallback => PAGE_NUMBERING_BASE,
        }
    }
}

/// URL of listing page `page` (1-based). Page 1 is the base URL itself.
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= PAGE_NUMBERING_BASE {
        base_url.to_string()
    } else {
        format!("{base_url}?{PAGE_QUERY_PARAM}={page}")
    }
}
