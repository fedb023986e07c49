//! HTML parsing infrastructure
//!
//! Trait-based extraction of catalog rows and entry details from rendered
//! documents, with selectors taken from configuration.

pub mod catalog_parser;
pub mod config;
pub mod context;
pub mod detail_parser;
pub mod dom;
pub mod error;
pub mod pagination_parser;

// Re-export public types
pub use catalog_parser::{CatalogParseReport, CatalogParser, PageExtraction};
pub use config::ParsingConfig;
pub use context::{DetailParseContext, ParseContext};
pub use detail_parser::DetailParser;
pub use error::{ParsingError, ParsingResult};
pub use pagination_parser::PaginationParser;

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
