//! Headless browser abstraction
//!
//! The fetch engine and page aggregator talk to a browser only through the
//! `BrowserLauncher` / `BrowserSession` traits. `chromium` provides the real
//! implementation; tests substitute scripted sessions.

pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use chromium::ChromiumLauncher;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Failed to capture document: {0}")]
    Capture(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

/// Document readiness levels a session can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Base document structure parsed
    DomContentLoaded,
    /// No network activity for a short quiet window
    NetworkIdle,
}

impl LoadState {
    /// CDP lifecycle event name signalling this state
    pub fn lifecycle_event(self) -> &'static str {
        match self {
            LoadState::DomContentLoaded => "DOMContentLoaded",
            LoadState::NetworkIdle => "networkIdle",
        }
    }
}

/// Outcome of an advisory readiness wait. Neither value is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderReadiness {
    Ready,
    NotConfirmedButProceeding,
}

impl RenderReadiness {
    pub fn is_ready(self) -> bool {
        matches!(self, RenderReadiness::Ready)
    }
}

/// Options applied when a session is launched
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub user_agent: String,
    /// Upper bound for individual protocol requests
    pub request_timeout: Duration,
    pub extra_args: Vec<String>,
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Start a fresh, isolated session with one blank page
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One browser process with a single page, owned by one fetch attempt
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate, failing if navigation errors or exceeds `timeout`
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    async fn wait_for_load_state(&mut self, state: LoadState, timeout: Duration) -> RenderReadiness;

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> RenderReadiness;

    /// Full serialized document of the current page
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Tear the session down. Safe to call more than once.
    async fn close(&mut self);
}
