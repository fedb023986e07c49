//! Reads the listing's pagination control ("Page 1 of 12").

use scraper::{Html, Selector};
use tracing::{info, warn};

use super::config::ListingSelectors;
use super::dom::{compile_selector, spaced_text};
use super::ParsingResult;
use crate::domain::pagination::PageCount;

pub struct PaginationParser {
    control_selector: Selector,
}

impl PaginationParser {
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            control_selector: compile_selector("listing.pagination", &selectors.pagination)?,
        })
    }

    /// Total page count advertised by the first listing page. A missing or
    /// unreadable control falls back to a single page.
    pub fn page_count(&self, page_html: &str) -> PageCount {
        let html = Html::parse_document(page_html);
        let count = html
            .select(&self.control_selector)
            .next()
            .map(|control| PageCount::from_control_text(&spaced_text(control)))
            .unwrap_or(PageCount::Fallback);

        match count {
            PageCount::Detected(total) => info!("[Listing] Detected total pages = {}", total),
            PageCount::Fallback => warn!("[Listing] Pagination control not readable, assuming 1 page"),
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PaginationParser {
        PaginationParser::with_config(&ListingSelectors::default()).unwrap()
    }

    #[test]
    fn test_reads_total_from_nested_control() {
        let html = r#"<div class="flex items-center gap-1"><button>&lt;</button>
            <span>Page</span><span>1</span><span>of</span><span>12</span></div>"#;
        assert_eq!(parser().page_count(html), PageCount::Detected(12));
    }

    #[test]
    fn test_missing_control_is_single_page() {
        assert_eq!(parser().page_count("<div>nothing here</div>"), PageCount::Fallback);
        assert_eq!(parser().page_count("<div>nothing here</div>").total(), 1);
    }
}
