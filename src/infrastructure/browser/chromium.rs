//! Chromium sessions over the DevTools protocol (chromiumoxide).

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{EventLifecycleEvent, SetLifecycleEventsEnabledParams};
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::Page;
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, warn};

use super::{BrowserError, BrowserLauncher, BrowserSession, LaunchOptions, LoadState, RenderReadiness};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches a local Chromium/Chrome per session
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self
    }

    fn browser_config(options: &LaunchOptions) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .window_size(1280, 1024)
            .request_timeout(options.request_timeout)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", options.user_agent));

        for arg in &options.extra_args {
            builder = builder.arg(arg.as_str());
        }

        if !options.headless {
            builder = builder.with_head();
        }

        builder
            .build()
            .map_err(|e| BrowserError::Launch(format!("invalid browser config: {}", e)))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let config = Self::browser_config(options)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    // Unknown CDP events fail to deserialize; they are harmless
                    if !message.contains("data did not match any variant") {
                        debug!("[Fetch] Browser handler error: {}", message);
                    }
                }
            }
        });

        let page = match open_page(&browser).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        let lifecycle = match page.event_listener::<EventLifecycleEvent>().await {
            Ok(stream) => stream,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(BrowserError::Protocol(e.to_string()));
            }
        };

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            lifecycle,
            handler_task,
            closed: false,
        }))
    }
}

async fn open_page(browser: &Browser) -> Result<Page, BrowserError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::Launch(format!("failed to open page: {}", e)))?;

    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await
        .map_err(|e| BrowserError::Protocol(e.to_string()))?;

    Ok(page)
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    lifecycle: EventStream<EventLifecycleEvent>,
    handler_task: JoinHandle<()>,
    closed: bool,
}

impl ChromiumSession {
    /// Forget lifecycle events that belong to the previous document
    fn drain_lifecycle(&mut self) {
        while let Some(Some(_)) = self.lifecycle.next().now_or_never() {}
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str, nav_timeout: Duration) -> Result<(), BrowserError> {
        self.drain_lifecycle();

        match timeout(nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(BrowserError::Timeout {
                url: url.to_string(),
                timeout_ms: nav_timeout.as_millis() as u64,
            }),
        }
    }

    async fn wait_for_load_state(&mut self, state: LoadState, wait: Duration) -> RenderReadiness {
        let expected = state.lifecycle_event();
        let lifecycle = &mut self.lifecycle;

        let reached = timeout(wait, async {
            while let Some(event) = lifecycle.next().await {
                if event.name == expected {
                    return true;
                }
            }
            false
        })
        .await;

        match reached {
            Ok(true) => RenderReadiness::Ready,
            _ => RenderReadiness::NotConfirmedButProceeding,
        }
    }

    async fn wait_for_selector(&mut self, selector: &str, wait: Duration) -> RenderReadiness {
        let deadline = Instant::now() + wait;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return RenderReadiness::Ready;
            }
            if Instant::now() >= deadline {
                return RenderReadiness::NotConfirmedButProceeding;
            }
            sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Capture(e.to_string()))
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.browser.close().await {
            warn!("[Fetch] Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("[Fetch] Browser process wait failed: {}", e);
        }
        self.handler_task.abort();
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            self.handler_task.abort();
        }
    }
}
