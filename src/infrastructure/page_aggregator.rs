//! Page aggregator for the paginated listing.
//!
//! All pages are fetched in one browser session: page 1 reveals the total
//! through its pagination control, pages 2..N follow sequentially. A failure
//! on any page fails the whole attempt, which the fetch engine retries from
//! page 1.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use super::browser::{BrowserSession, LoadState};
use super::fetch_engine::{FetchEngine, FetchPlan};
use super::fetch_error::{AttemptFailure, FetchResult};
use super::parsing::PaginationParser;
use crate::application::validated_config::ValidatedFetchConfig;
use crate::domain::pagination::{PageCount, page_url};

/// Upper bound on slots reserved from the advertised page count
const PREALLOCATED_PAGES: usize = 64;

/// Listing pages in page order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet {
    pub page_count: PageCount,
    pub pages: Vec<String>,
}

impl PageSet {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(String::as_str)
    }

    /// Pages joined by the boundary marker, each on its own line
    pub fn joined(&self, marker: &str) -> String {
        self.pages.join(&format!("\n{}\n", marker))
    }
}

pub struct PageAggregator<'a> {
    engine: &'a FetchEngine,
    pagination: PaginationParser,
    page_break_marker: String,
}

impl<'a> PageAggregator<'a> {
    pub fn new(engine: &'a FetchEngine, pagination: PaginationParser, page_break_marker: impl Into<String>) -> Self {
        Self {
            engine,
            pagination,
            page_break_marker: page_break_marker.into(),
        }
    }

    /// Fetch every listing page under the engine's attempt budget. The
    /// marker-joined set is snapshotted under `snapshot_name`.
    pub async fn fetch_all(&self, listing_url: &str, snapshot_name: &str) -> FetchResult<PageSet> {
        let plan = ListingPlan {
            base_url: listing_url,
            pagination: &self.pagination,
            config: self.engine.config(),
        };

        let pages = self.engine.execute(&plan).await?;

        if let Some(store) = self.engine.snapshots() {
            store.save(snapshot_name, &pages.joined(&self.page_break_marker)).await;
        }

        info!("[Listing] Fetched {} pages from {}", pages.len(), listing_url);
        Ok(pages)
    }
}

struct ListingPlan<'a> {
    base_url: &'a str,
    pagination: &'a PaginationParser,
    config: &'a ValidatedFetchConfig,
}

impl ListingPlan<'_> {
    /// Navigate, wait for network idle (soft), grace period, capture
    async fn load(&self, session: &mut dyn BrowserSession, url: &str, page: u32) -> Result<String, AttemptFailure> {
        session.goto(url, self.config.navigation_timeout).await?;

        if !session
            .wait_for_load_state(LoadState::NetworkIdle, self.config.navigation_timeout)
            .await
            .is_ready()
        {
            warn!("[Listing] networkidle timeout at page {}", page);
        }

        sleep(self.config.grace_period).await;
        Ok(session.content().await?)
    }
}

#[async_trait]
impl<'a> FetchPlan for ListingPlan<'a> {
    type Output = PageSet;

    fn target(&self) -> &str {
        self.base_url
    }

    fn retry_delay(&self) -> Duration {
        self.config.listing_retry_delay
    }

    async fn attempt(&self, session: &mut dyn BrowserSession) -> Result<PageSet, AttemptFailure> {
        info!("[Listing] Loading page 1");
        let first = self.load(session, self.base_url, 1).await?;

        let page_count = self.pagination.page_count(&first);
        let total = page_count.total();
        let mut pages = Vec::with_capacity((total as usize).min(PREALLOCATED_PAGES));
        pages.push(first);

        for page in 2..=total {
            let url = page_url(self.base_url, page);
            info!("[Listing] Fetching page {}/{} → {}", page, total, url);
            pages.push(self.load(session, &url, page).await?);
        }

        Ok(PageSet { page_count, pages })
    }
}
