//! Infrastructure layer: browser driving, HTML extraction and file I/O
//!
//! This module provides the headless browser abstraction, the fetch engine
//! and page aggregator built on it, the HTML parsers, artifact storage,
//! configuration and logging.

pub mod browser;
pub mod config;
pub mod fetch_engine;
pub mod fetch_error;
pub mod logging;
pub mod page_aggregator;
pub mod parsing;
pub mod parsing_error;
pub mod record_store;
pub mod snapshot_store;

// Re-export commonly used items
pub use browser::{BrowserLauncher, BrowserSession, ChromiumLauncher, LoadState, RenderReadiness};
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use fetch_engine::{DocumentFetcher, FetchEngine, FetchPlan};
pub use fetch_error::{AttemptFailure, FetchError};
pub use logging::{init_logging, init_logging_with_config};
pub use page_aggregator::{PageAggregator, PageSet};
pub use parsing::{CatalogParser, DetailParser, PaginationParser, ParsingConfig, ParsingError};
pub use record_store::{JsonFileStore, RecordStore, StoreError};
pub use snapshot_store::SnapshotStore;
