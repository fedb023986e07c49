//! Scripted browser and fetcher doubles shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pokebase_scraper_lib::application::ValidatedFetchConfig;
use pokebase_scraper_lib::infrastructure::browser::{
    BrowserError, BrowserLauncher, BrowserSession, LaunchOptions, LoadState, RenderReadiness,
};
use pokebase_scraper_lib::infrastructure::fetch_engine::DocumentFetcher;
use pokebase_scraper_lib::infrastructure::fetch_error::{AttemptFailure, FetchError, FetchResult};

pub const CHARIZARD_PAGE: &str = include_str!("../fixtures/charizard.html");
pub const LISTING_URL: &str = "https://pokebase.app/pokemon-go/pokemon";

/// What a navigation to a URL produces
#[derive(Debug, Clone)]
pub enum Visit {
    Document(String),
    NavigationError,
}

#[derive(Default)]
struct BrowserState {
    routes: HashMap<String, VecDeque<Visit>>,
    failing_launches: u32,
    launches: u32,
    closes: u32,
    visited: Vec<String>,
}

/// A browser whose pages are scripted per URL. Each navigation consumes
/// the next scripted visit; the last one repeats.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, visits: Vec<Visit>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(url.to_string(), visits.into());
        self
    }

    pub fn fail_next_launches(&self, count: u32) -> &Self {
        self.state.lock().unwrap().failing_launches = count;
        self
    }

    pub fn launcher(&self) -> Arc<dyn BrowserLauncher> {
        Arc::new(self.clone())
    }

    pub fn launches(&self) -> u32 {
        self.state.lock().unwrap().launches
    }

    pub fn closes(&self) -> u32 {
        self.state.lock().unwrap().closes
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self, _options: &LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.launches += 1;
        if state.failing_launches > 0 {
            state.failing_launches -= 1;
            return Err(BrowserError::Launch("chromium not found".to_string()));
        }
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
            current: None,
            closed: false,
        }))
    }
}

struct FakeSession {
    state: Arc<Mutex<BrowserState>>,
    current: Option<String>,
    closed: bool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());

        let visit = match state.routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match visit {
            Some(Visit::Document(html)) => {
                self.current = Some(html);
                Ok(())
            }
            Some(Visit::NavigationError) | None => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            }),
        }
    }

    async fn wait_for_load_state(&mut self, _state: LoadState, _timeout: Duration) -> RenderReadiness {
        RenderReadiness::Ready
    }

    async fn wait_for_selector(&mut self, _selector: &str, _timeout: Duration) -> RenderReadiness {
        match &self.current {
            Some(html) if html.contains("font-logo") => RenderReadiness::Ready,
            _ => RenderReadiness::NotConfirmedButProceeding,
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.current
            .clone()
            .ok_or_else(|| BrowserError::Capture("no document loaded".to_string()))
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().unwrap().closes += 1;
        }
    }
}

/// Defaults with every sleep removed
pub fn fast_config(attempts: u32) -> ValidatedFetchConfig {
    ValidatedFetchConfig {
        attempts,
        grace_period: Duration::ZERO,
        listing_retry_delay: Duration::ZERO,
        detail_retry_delay: Duration::ZERO,
        content_marker_timeout: Duration::from_millis(10),
        ..ValidatedFetchConfig::default()
    }
}

/// Fetcher that serves fixed documents by URL and counts calls
#[derive(Clone, Default)]
pub struct FakeFetcher {
    documents: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, url: &str, html: &str) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for FakeFetcher {
    async fn fetch_document(&self, url: &str, _snapshot_name: &str) -> FetchResult<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::AttemptsExhausted {
                url: url.to_string(),
                attempts: 2,
                last_error: AttemptFailure::ShortCapture { length: 0, minimum: 200 },
            })
    }
}

/// One listing page with a pagination control and the given (slug, name) rows
pub fn listing_page(page: u32, total: u32, rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(slug, name)| {
            format!(
                r#"<div class="table-row">
  <span class="table-cell"><a href="/pokemon-go/pokemon/{slug}"><img src="/img/{slug}.png?w=64"><span class="font-semibold"><div class="truncate">{name}</div></span></a></span>
  <span class="table-cell">1000</span><span class="table-cell">1</span><span class="table-cell">2</span>
  <span class="table-cell">3</span><span class="table-cell">A</span><span class="table-cell">100</span>
  <span class="table-cell">90</span><span class="table-cell">80</span>
</div>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
<div class="table-row-group">{rows}</div>
<div class="flex items-center gap-1"><span>Page</span> <span>{page}</span> <span>of</span> <span>{total}</span></div>
</body></html>"#
    )
}
