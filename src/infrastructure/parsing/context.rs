//! Parsing context for HTML extraction
//!
//! Provides context objects carried through an extraction call, used for
//! resolving links and for log/error messages.

/// Context for one listing page inside a page set
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// 1-based page number within the set
    pub page_number: usize,

    /// Origin for resolving relative entry links
    pub site_origin: String,
}

impl ParseContext {
    pub fn new(page_number: usize, site_origin: impl Into<String>) -> Self {
        Self {
            page_number,
            site_origin: site_origin.into(),
        }
    }
}

/// Detail parsing context for a single entry page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Entry URL the document was fetched from
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
