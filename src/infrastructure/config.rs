//! Configuration infrastructure
//!
//! Layered configuration for the scraper:
//! 1. Built-in defaults (the `defaults` module below)
//! 2. An optional JSON/TOML file
//! 3. `POKEBASE__<SECTION>__<KEY>` environment variables
//!
//! The merged result is validated once; downstream code never re-checks it.

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;
use url::Url;

pub use crate::infrastructure::parsing::config::{
    DetailSelectors, ListingSelectors, MetricColumns, ParsingConfig,
};

/// Environment variable prefix, e.g. `POKEBASE__SCRAPER__RETRIES=3`
pub const ENV_PREFIX: &str = "POKEBASE";
const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Invalid configuration value for `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("Failed to persist configuration to {path:?}: {message}")]
    Persist { path: PathBuf, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser and retry behavior of the fetch engine
    pub scraper: ScraperConfig,

    /// Input/output locations and pacing of a run
    pub run: RunConfig,

    /// Selectors, column layout and site origin used by the extractors
    pub parsing: ParsingConfig,

    pub logging: LoggingConfig,
}

/// Fetch engine options. Field names follow the option bag the engine
/// has always accepted, so existing config files keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Run Chromium without a visible window
    pub headless: bool,

    /// Attempts per fetch (not additional retries)
    pub retries: u32,

    /// Navigation timeout in milliseconds
    pub pw_timeout: u64,

    /// Grace period after the readiness signal, in seconds
    pub wait_after_idle: f64,

    pub user_agent: String,

    /// Pause between failed listing attempts, in seconds
    pub delay: f64,

    /// Pause between failed detail attempts, in seconds
    pub detail_retry_delay: f64,

    /// Soft wait for the detail content marker, in milliseconds
    pub content_marker_timeout: u64,

    /// Captures shorter than this are treated as failed attempts
    pub min_document_length: usize,

    /// Extra Chromium command-line switches
    pub browser_args: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: defaults::HEADLESS,
            retries: defaults::RETRIES,
            pw_timeout: defaults::NAVIGATION_TIMEOUT_MS,
            wait_after_idle: defaults::WAIT_AFTER_IDLE_SECS,
            user_agent: defaults::USER_AGENT.to_string(),
            delay: defaults::LISTING_RETRY_DELAY_SECS,
            detail_retry_delay: defaults::DETAIL_RETRY_DELAY_SECS,
            content_marker_timeout: defaults::CONTENT_MARKER_TIMEOUT_MS,
            min_document_length: defaults::MIN_DOCUMENT_LENGTH,
            browser_args: Vec::new(),
        }
    }
}

/// Run orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// First listing page
    pub listing_url: String,

    /// Catalog JSON written by the catalog pass and read by the detail pass
    pub catalog_file: PathBuf,

    /// One `<slug>.json` per entry
    pub output_dir: PathBuf,

    /// Raw HTML captures, one file per fetched document
    pub snapshot_dir: Option<PathBuf>,

    /// Pause after each entry that reached the fetch step, in seconds
    pub politeness_delay: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::LISTING_URL.to_string(),
            catalog_file: PathBuf::from(defaults::CATALOG_FILE),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            snapshot_dir: Some(PathBuf::from(defaults::SNAPSHOT_DIR)),
            politeness_delay: defaults::POLITENESS_DELAY_SECS,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for log files; defaults to `<data dir>/pokebase-scraper/logs`
    pub log_dir: Option<PathBuf>,

    /// Number of log files to keep (older files are deleted on startup)
    pub max_files: u32,

    pub auto_cleanup_logs: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
        }
    }
}

impl AppConfig {
    /// Merge defaults, the optional file and environment overrides, then
    /// validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the fetch engine and orchestrator cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scraper = &self.scraper;

        if scraper.retries == 0 {
            return Err(ConfigError::invalid("scraper.retries", "must be at least 1"));
        }
        if scraper.pw_timeout == 0 {
            return Err(ConfigError::invalid("scraper.pw_timeout", "must be greater than 0"));
        }
        if scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("scraper.user_agent", "must not be empty"));
        }
        if scraper.min_document_length == 0 {
            return Err(ConfigError::invalid(
                "scraper.min_document_length",
                "must be greater than 0",
            ));
        }

        for (field, seconds) in [
            ("scraper.wait_after_idle", scraper.wait_after_idle),
            ("scraper.delay", scraper.delay),
            ("scraper.detail_retry_delay", scraper.detail_retry_delay),
            ("run.politeness_delay", self.run.politeness_delay),
        ] {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative number of seconds, got {}", seconds),
                ));
            }
            if seconds > defaults::MAX_WAIT_SECS {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be at most {} seconds, got {}", defaults::MAX_WAIT_SECS, seconds),
                ));
            }
        }

        for (field, value) in [
            ("run.listing_url", self.run.listing_url.as_str()),
            ("parsing.site_origin", self.parsing.site_origin.as_str()),
        ] {
            let parsed = Url::parse(value)
                .map_err(|e| ConfigError::invalid(field, format!("{}: {}", value, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(field, "must be an http(s) URL"));
            }
        }

        if self.parsing.page_break_marker.is_empty() {
            return Err(ConfigError::invalid("parsing.page_break_marker", "must not be empty"));
        }

        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::invalid(
                "logging",
                "at least one of console_output or file_output must be enabled",
            ));
        }

        Ok(())
    }
}

/// Locates and persists the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Per-user configuration directory
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME))
    }

    /// Per-user data directory (logs live here by default)
    pub fn get_app_data_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(defaults::APP_DIR_NAME))
    }

    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager pointing at `<config dir>/pokebase-scraper/config.json`,
    /// falling back to the working directory when no config dir exists.
    pub fn with_default_path() -> Self {
        let dir = Self::get_config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(defaults::CONFIG_FILE_NAME))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the layered configuration. A missing file is not an error;
    /// defaults and environment overrides still apply.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        if self.config_path.exists() {
            info!("Loading configuration from: {:?}", self.config_path);
            AppConfig::load(Some(&self.config_path))
        } else {
            info!(
                "Configuration file not found at {:?}, using defaults",
                self.config_path
            );
            AppConfig::load(None)
        }
    }

    /// Write `config` as pretty JSON, creating parent directories
    pub async fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let persist_err = |message: String| ConfigError::Persist {
            path: self.config_path.clone(),
            message,
        };

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| persist_err(e.to_string()))?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).map_err(|e| persist_err(e.to_string()))?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|e| persist_err(e.to_string()))?;

        info!("✅ Configuration saved to: {:?}", self.config_path);
        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    use crate::domain::constants::{capture, site, timing};

    pub const APP_DIR_NAME: &str = "pokebase-scraper";
    pub const CONFIG_FILE_NAME: &str = "config.json";

    pub const HEADLESS: bool = true;

    /// Total attempts per fetch
    pub const RETRIES: u32 = 2;

    pub const NAVIGATION_TIMEOUT_MS: u64 = timing::NAVIGATION_TIMEOUT_MS;
    pub const WAIT_AFTER_IDLE_SECS: f64 = timing::GRACE_PERIOD_SECS;
    pub const LISTING_RETRY_DELAY_SECS: f64 = timing::LISTING_RETRY_DELAY_SECS;
    pub const DETAIL_RETRY_DELAY_SECS: f64 = timing::DETAIL_RETRY_DELAY_SECS;
    pub const CONTENT_MARKER_TIMEOUT_MS: u64 = timing::CONTENT_MARKER_TIMEOUT_MS;
    pub const POLITENESS_DELAY_SECS: f64 = timing::POLITENESS_DELAY_SECS;
    pub const MIN_DOCUMENT_LENGTH: usize = capture::MIN_DOCUMENT_LENGTH;

    /// Ceiling for every configured sleep
    pub const MAX_WAIT_SECS: f64 = 3600.0;

    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    pub const LISTING_URL: &str = site::LISTING_URL;
    pub const CATALOG_FILE: &str = "data/pokemon_list.json";
    pub const OUTPUT_DIR: &str = "data/pokemon_detail";
    pub const SNAPSHOT_DIR: &str = "data/raw_html";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = true;
    pub const LOG_MAX_FILES: u32 = 7;
    pub const LOG_AUTO_CLEANUP: bool = true;
}
