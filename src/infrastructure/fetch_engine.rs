//! Fetch engine: one fresh browser session per attempt, bounded retries.
//!
//! An attempt launches a session, runs a `FetchPlan` against it and always
//! closes the session before the outcome is inspected. Failed attempts are
//! logged and retried after the plan's delay until the attempt budget is
//! spent.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use url::Url;

use super::browser::{BrowserError, BrowserLauncher, BrowserSession, LoadState};
use super::fetch_error::{AttemptFailure, FetchError, FetchResult};
use super::snapshot_store::SnapshotStore;
use crate::application::validated_config::ValidatedFetchConfig;

/// What to do inside one browser session
#[async_trait]
pub trait FetchPlan: Send + Sync {
    type Output: Send;

    /// URL used in logs and errors
    fn target(&self) -> &str;

    /// Pause between a failed attempt and the next one
    fn retry_delay(&self) -> Duration;

    async fn attempt(&self, session: &mut dyn BrowserSession) -> Result<Self::Output, AttemptFailure>;
}

/// Source of rendered entry documents, as seen by the run orchestrator
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Rendered document for `url`; the capture is also snapshotted
    /// under `snapshot_name`.
    async fn fetch_document(&self, url: &str, snapshot_name: &str) -> FetchResult<String>;
}

pub struct FetchEngine {
    launcher: Arc<dyn BrowserLauncher>,
    config: ValidatedFetchConfig,
    snapshots: Option<SnapshotStore>,
}

impl FetchEngine {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ValidatedFetchConfig) -> Self {
        Self {
            launcher,
            config,
            snapshots: None,
        }
    }

    pub fn with_snapshots(mut self, store: SnapshotStore) -> Self {
        self.snapshots = Some(store);
        self
    }

    pub fn config(&self) -> &ValidatedFetchConfig {
        &self.config
    }

    pub fn snapshots(&self) -> Option<&SnapshotStore> {
        self.snapshots.as_ref()
    }

    /// Run `plan` until it succeeds or the attempt budget is spent
    pub async fn execute<P: FetchPlan>(&self, plan: &P) -> FetchResult<P::Output> {
        let url = plan.target();
        Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let attempts = self.config.attempts;
        let mut last_error = AttemptFailure::Browser(BrowserError::Launch("no attempt made".to_string()));

        for attempt in 1..=attempts {
            info!("[Fetch] Attempt {}/{} for {}", attempt, attempts, url);

            let outcome = match self.launcher.launch(&self.config.launch_options()).await {
                Ok(mut session) => {
                    let outcome = plan.attempt(session.as_mut()).await;
                    session.close().await;
                    outcome
                }
                Err(e) => Err(AttemptFailure::Browser(e)),
            };

            match outcome {
                Ok(output) => return Ok(output),
                Err(failure) => {
                    warn!("[Fetch] Attempt {}/{} failed for {}: {}", attempt, attempts, url, failure);
                    last_error = failure;
                    if attempt < attempts {
                        sleep(plan.retry_delay()).await;
                    }
                }
            }
        }

        error!("[Fetch] All {} attempts failed for {}", attempts, url);
        Err(FetchError::AttemptsExhausted {
            url: url.to_string(),
            attempts,
            last_error,
        })
    }

    async fn save_snapshot(&self, name: &str, html: &str) {
        if let Some(store) = &self.snapshots {
            store.save(name, html).await;
        }
    }
}

#[async_trait]
impl DocumentFetcher for FetchEngine {
    async fn fetch_document(&self, url: &str, snapshot_name: &str) -> FetchResult<String> {
        let plan = DetailPagePlan {
            url,
            config: &self.config,
        };
        let html = self.execute(&plan).await?;
        self.save_snapshot(snapshot_name, &html).await;
        Ok(html)
    }
}

/// Single entry page: structural readiness, soft content-marker wait,
/// grace period, then a length-checked capture.
struct DetailPagePlan<'a> {
    url: &'a str,
    config: &'a ValidatedFetchConfig,
}

#[async_trait]
impl<'a> FetchPlan for DetailPagePlan<'a> {
    type Output = String;

    fn target(&self) -> &str {
        self.url
    }

    fn retry_delay(&self) -> Duration {
        self.config.detail_retry_delay
    }

    async fn attempt(&self, session: &mut dyn BrowserSession) -> Result<String, AttemptFailure> {
        let config = self.config;

        info!("[Detail] Loading URL: {}", self.url);
        session.goto(self.url, config.navigation_timeout).await?;

        if !session
            .wait_for_load_state(LoadState::DomContentLoaded, config.navigation_timeout)
            .await
            .is_ready()
        {
            warn!("[Detail] DOMContentLoaded not confirmed for {}, continuing", self.url);
        }

        if !session
            .wait_for_selector(&config.content_marker, config.content_marker_timeout)
            .await
            .is_ready()
        {
            warn!("[Detail] {} not found, continue anyway", config.content_marker);
        }

        sleep(config.grace_period).await;

        let html = session.content().await?;
        check_length(&html, config.min_document_length)?;
        Ok(html)
    }
}

/// Reject empty or truncated captures
pub(crate) fn check_length(html: &str, minimum: usize) -> Result<(), AttemptFailure> {
    let length = html.chars().count();
    if length < minimum {
        Err(AttemptFailure::ShortCapture { length, minimum })
    } else {
        Ok(())
    }
}
