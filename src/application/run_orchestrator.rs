//! Detail pass over a catalog: fetch, extract, combine, persist.
//!
//! Entries are processed strictly one at a time. An entry whose artifact
//! already exists is skipped, which makes reruns resumable. Nothing that
//! goes wrong with a single entry stops the run; only an unreadable
//! catalog does.

#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::domain::catalog_record::{CatalogDocument, CatalogRecord};
use crate::domain::combined_record::CombinedRecord;
use crate::domain::slug::Slug;
use crate::infrastructure::fetch_engine::DocumentFetcher;
use crate::infrastructure::fetch_error::FetchError;
use crate::infrastructure::parsing::{DetailParseContext, DetailParser, ParsingError};
use crate::infrastructure::record_store::{RecordStore, StoreError, read_catalog};

/// The only condition that halts a run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Catalog file {path:?} could not be loaded: {source}")]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

/// Why a single entry failed
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("entry has no url")]
    MissingUrl,

    #[error("cannot derive a slug from {0}")]
    NoSlug(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParsingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EntryError {
    /// Whether the entry got as far as issuing a request
    fn reached_fetch(&self) -> bool {
        matches!(self, EntryError::Fetch(_) | EntryError::Parse(_) | EntryError::Store(_))
    }
}

#[derive(Debug)]
pub enum EntryOutcome {
    Saved(PathBuf),
    AlreadyPresent(Slug),
    Failed(EntryError),
}

/// Final counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub success: usize,
    pub failed: usize,
    /// Entries whose artifact already existed
    pub skipped: usize,
    pub total: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Saved(_) => self.success += 1,
            EntryOutcome::AlreadyPresent(_) => self.skipped += 1,
            EntryOutcome::Failed(_) => self.failed += 1,
        }
    }
}

pub struct RunOrchestrator {
    fetcher: Arc<dyn DocumentFetcher>,
    parser: Arc<DetailParser>,
    store: Arc<dyn RecordStore>,
    politeness_delay: Duration,
}

impl RunOrchestrator {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        parser: Arc<DetailParser>,
        store: Arc<dyn RecordStore>,
        politeness_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            parser,
            store,
            politeness_delay,
        }
    }

    /// Load the catalog file and run every entry
    pub async fn run_catalog_file(&self, catalog_file: &Path) -> Result<RunSummary, RunError> {
        let catalog = read_catalog(catalog_file)
            .await
            .map_err(|source| RunError::CatalogUnavailable {
                path: catalog_file.to_path_buf(),
                source,
            })?;

        info!("[Run] Loaded {} entries from {:?}", catalog.len(), catalog_file);
        Ok(self.run(&catalog).await)
    }

    pub async fn run(&self, catalog: &CatalogDocument) -> RunSummary {
        let mut summary = RunSummary {
            total: catalog.len(),
            ..Default::default()
        };

        for (idx, entry) in catalog.results.iter().enumerate() {
            let label = entry.name.as_deref().unwrap_or("<unnamed>");
            info!("[Run] ({}/{}) {}", idx + 1, summary.total, label);

            let outcome = self.process_entry(entry).await;
            match &outcome {
                EntryOutcome::Saved(path) => info!("[Run] ✅ Saved {:?}", path),
                EntryOutcome::AlreadyPresent(slug) => info!("[Run] ⏭️ Skip {} (already exists)", slug),
                EntryOutcome::Failed(EntryError::MissingUrl) => warn!("[Run] ⚠️ Entry '{}' has no url", label),
                EntryOutcome::Failed(e) => error!("[Run] ❌ Error processing '{}': {}", label, e),
            }
            summary.record(&outcome);

            let reached_fetch = match &outcome {
                EntryOutcome::Saved(_) => true,
                EntryOutcome::AlreadyPresent(_) => false,
                EntryOutcome::Failed(e) => e.reached_fetch(),
            };
            if reached_fetch {
                sleep(self.politeness_delay).await;
            }
        }

        info!(
            "[Run] 🎉 Done: success={}, failed={}, skipped={}, total={}",
            summary.success, summary.failed, summary.skipped, summary.total
        );
        summary
    }

    /// fetch → extract → combine → persist for one catalog entry
    pub async fn process_entry(&self, entry: &CatalogRecord) -> EntryOutcome {
        let Some(url) = entry.url.as_deref() else {
            return EntryOutcome::Failed(EntryError::MissingUrl);
        };
        let Some(slug) = Slug::from_url(url) else {
            return EntryOutcome::Failed(EntryError::NoSlug(url.to_string()));
        };

        if self.store.exists(&slug).await {
            return EntryOutcome::AlreadyPresent(slug);
        }

        match self.fetch_and_save(url, &slug, entry).await {
            Ok(path) => EntryOutcome::Saved(path),
            Err(e) => EntryOutcome::Failed(e),
        }
    }

    async fn fetch_and_save(&self, url: &str, slug: &Slug, entry: &CatalogRecord) -> Result<PathBuf, EntryError> {
        let document = self.fetcher.fetch_document(url, slug.as_str()).await?;
        let detail = self
            .parser
            .parse_document(&document, &DetailParseContext::new(url))?;
        let combined = CombinedRecord::new(entry.clone(), detail);
        Ok(self.store.save(slug, &combined).await?)
    }
}
