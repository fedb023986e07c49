//! Parsing error types for the catalog and detail extractors
//!
//! Extraction is tolerant by construction: a missing field becomes an absent
//! value, not an error. The variants here cover what is left: selectors that
//! do not compile and whole rows that must be skipped.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for '{field}': {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("Row {row} on page {page} skipped: {reason}")]
    RowSkipped {
        page: usize,
        row: usize,
        reason: String,
    },
}

impl ParsingError {
    pub fn invalid_selector(field: &str, selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    pub fn row_skipped(page: usize, row: usize, reason: impl Into<String>) -> Self {
        Self::RowSkipped {
            page,
            row,
            reason: reason.into(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_names_the_field() {
        let err = ParsingError::invalid_selector("listing.row", "div[", "unexpected end");
        assert_eq!(
            err.to_string(),
            "Invalid CSS selector for 'listing.row': div[ - unexpected end"
        );
    }

    #[test]
    fn test_display_names_the_row() {
        let err = ParsingError::row_skipped(2, 7, "no cells");
        assert_eq!(err.to_string(), "Row 7 on page 2 skipped: no cells");
    }
}
