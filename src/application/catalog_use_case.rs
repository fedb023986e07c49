//! Catalog pass: fetch every listing page, extract rows, write the catalog.

#![allow(clippy::uninlined_format_args)]

use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::catalog_record::CatalogDocument;
use crate::infrastructure::fetch_engine::FetchEngine;
use crate::infrastructure::fetch_error::FetchError;
use crate::infrastructure::page_aggregator::PageAggregator;
use crate::infrastructure::parsing::{CatalogParseReport, CatalogParser, PaginationParser};
use crate::infrastructure::record_store::{StoreError, write_pretty_json};

/// Snapshot name of the aggregated listing
pub const LISTING_SNAPSHOT_NAME: &str = "pokemon_list";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CatalogUseCase<'a> {
    aggregator: PageAggregator<'a>,
    parser: CatalogParser,
}

impl<'a> CatalogUseCase<'a> {
    pub fn new(
        engine: &'a FetchEngine,
        pagination: PaginationParser,
        parser: CatalogParser,
        page_break_marker: &str,
    ) -> Self {
        Self {
            aggregator: PageAggregator::new(engine, pagination, page_break_marker),
            parser,
        }
    }

    /// Fetch and parse the listing without writing anything
    pub async fn collect(&self, listing_url: &str) -> Result<(CatalogDocument, CatalogParseReport), CatalogError> {
        let pages = self.aggregator.fetch_all(listing_url, LISTING_SNAPSHOT_NAME).await?;
        Ok(self.parser.parse_pages(pages.iter()))
    }

    /// Collect the catalog and write it to `catalog_file`
    pub async fn execute(&self, listing_url: &str, catalog_file: &Path) -> Result<CatalogParseReport, CatalogError> {
        let (catalog, report) = self.collect(listing_url).await?;

        for (page, rows, records) in &report.pages {
            info!("[Catalog] Page {}: {} rows, {} records", page, rows, records);
        }

        write_pretty_json(catalog_file, &catalog).await?;
        info!("[Catalog] ✅ Saved {} entries to {:?}", catalog.len(), catalog_file);
        Ok(report)
    }
}
