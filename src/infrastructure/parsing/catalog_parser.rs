//! Catalog parser for listing pages
//!
//! Splits an aggregated page set on its boundary markers, parses every page
//! on its own and walks the table rows. Rows that cannot be read are
//! skipped and tallied; they never abort the page or the set.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::config::{MetricColumns, ParsingConfig};
use super::dom::{attr, compile_selector, select_text, stripped_text};
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::catalog_record::{CatalogDocument, CatalogRecord};
use crate::utils::{clean_image_attr, resolve_site_url};

/// Rows extracted from one listing page
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub page_number: usize,
    pub rows_found: usize,
    pub records: Vec<CatalogRecord>,
    pub skipped: Vec<ParsingError>,
}

/// Per-page diagnostics for a whole page set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogParseReport {
    /// (page number, rows found, records extracted), in page order
    pub pages: Vec<(usize, usize, usize)>,
    pub skipped_rows: usize,
}

impl CatalogParseReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn total_records(&self) -> usize {
        self.pages.iter().map(|(_, _, records)| records).sum()
    }
}

/// Parser for the paginated catalog table
pub struct CatalogParser {
    row_selector: Selector,
    cell_selector: Selector,
    anchor_selector: Selector,
    name_truncated_selector: Selector,
    name_plain_selector: Selector,
    image_selector: Selector,
    columns: MetricColumns,
    site_origin: String,
    page_break_marker: String,
}

impl CatalogParser {
    /// Create a catalog parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let listing = &config.listing;
        Ok(Self {
            row_selector: compile_selector("listing.row", &listing.row)?,
            cell_selector: compile_selector("listing.cell", &listing.cell)?,
            anchor_selector: compile_selector("listing.anchor", &listing.anchor)?,
            name_truncated_selector: compile_selector(
                "listing.name_truncated",
                &listing.name_truncated,
            )?,
            name_plain_selector: compile_selector("listing.name_plain", &listing.name_plain)?,
            image_selector: compile_selector("listing.image", &listing.image)?,
            columns: config.columns.clone(),
            site_origin: config.site_origin.clone(),
            page_break_marker: config.page_break_marker.clone(),
        })
    }

    /// Parse a marker-joined page set into `{results: [...]}` plus a report.
    pub fn parse_page_set(&self, document_set: &str) -> (CatalogDocument, CatalogParseReport) {
        let pages: Vec<&str> = document_set.split(self.page_break_marker.as_str()).collect();
        info!("[Catalog] Begin parse: detected {} pages merged", pages.len());
        self.parse_pages(pages)
    }

    /// Parse already separated pages, numbered from 1 in iteration order.
    pub fn parse_pages<'a, I>(&self, pages: I) -> (CatalogDocument, CatalogParseReport)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut results = Vec::new();
        let mut report = CatalogParseReport::default();

        for (idx, page_html) in pages.into_iter().enumerate() {
            let html = Html::parse_document(page_html);
            let context = ParseContext::new(idx + 1, self.site_origin.clone());

            let extraction = match self.parse_with_context(&html, &context) {
                Ok(extraction) => extraction,
                Err(e) => {
                    warn!("[Catalog] Page {} could not be parsed: {}", context.page_number, e);
                    PageExtraction {
                        page_number: context.page_number,
                        ..Default::default()
                    }
                }
            };

            report.pages.push((
                extraction.page_number,
                extraction.rows_found,
                extraction.records.len(),
            ));
            report.skipped_rows += extraction.skipped.len();
            results.extend(extraction.records);
        }

        info!(
            "[Catalog] Parse complete: {} records from {} pages ({} rows skipped)",
            results.len(),
            report.page_count(),
            report.skipped_rows
        );

        (CatalogDocument::new(results), report)
    }

    /// Extract one row. Rows without cells or without a first-cell anchor
    /// are reported as skipped.
    fn extract_row(
        &self,
        row: ElementRef<'_>,
        row_index: usize,
        context: &ParseContext,
    ) -> ParsingResult<CatalogRecord> {
        let cells: Vec<ElementRef<'_>> = row.select(&self.cell_selector).collect();
        let first = cells
            .first()
            .ok_or_else(|| ParsingError::row_skipped(context.page_number, row_index, "no cells"))?;

        let anchor = first.select(&self.anchor_selector).next().ok_or_else(|| {
            ParsingError::row_skipped(context.page_number, row_index, "no anchor in first cell")
        })?;

        let name = select_text(anchor, &self.name_truncated_selector)
            .or_else(|| select_text(anchor, &self.name_plain_selector));

        let url = anchor
            .value()
            .attr("href")
            .map(|href| resolve_site_url(&context.site_origin, href));

        let image = anchor
            .select(&self.image_selector)
            .next()
            .and_then(|img| clean_image_attr(attr(img, "src").as_deref()));

        let mut record = CatalogRecord {
            name,
            url,
            image,
            ..Default::default()
        };

        for (field, index) in self.columns.mapping() {
            record.set_metric(field, cells.get(index).map(|cell| stripped_text(*cell)));
        }

        Ok(record)
    }
}

impl ContextualParser for CatalogParser {
    type Output = PageExtraction;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let rows: Vec<ElementRef<'_>> = html.select(&self.row_selector).collect();
        info!("[Catalog] Parsing page {}: found {} rows", context.page_number, rows.len());

        let mut extraction = PageExtraction {
            page_number: context.page_number,
            rows_found: rows.len(),
            ..Default::default()
        };

        for (row_index, row) in rows.into_iter().enumerate() {
            match self.extract_row(row, row_index + 1, context) {
                Ok(record) => extraction.records.push(record),
                Err(e) => {
                    debug!("[Catalog] {}", e);
                    extraction.skipped.push(e);
                }
            }
        }

        Ok(extraction)
    }
}
