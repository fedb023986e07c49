//! Fetch engine retry and session lifecycle tests against a scripted browser

mod common;

use common::{CHARIZARD_PAGE, FakeBrowser, Visit, fast_config};
use pokebase_scraper_lib::infrastructure::fetch_engine::{DocumentFetcher, FetchEngine};
use pokebase_scraper_lib::infrastructure::fetch_error::{AttemptFailure, FetchError};
use pokebase_scraper_lib::infrastructure::snapshot_store::SnapshotStore;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

const ENTRY_URL: &str = "https://pokebase.app/pokemon-go/pokemon/6";

#[tokio::test]
async fn test_short_capture_exhausts_attempts() {
    let browser = FakeBrowser::new();
    browser.serve(ENTRY_URL, vec![Visit::Document("<html></html>".to_string())]);
    let engine = FetchEngine::new(browser.launcher(), fast_config(3));

    let err = engine.fetch_document(ENTRY_URL, "6").await.unwrap_err();

    match err {
        FetchError::AttemptsExhausted { url, attempts, last_error } => {
            assert_eq!(url, ENTRY_URL);
            assert_eq!(attempts, 3);
            assert!(matches!(last_error, AttemptFailure::ShortCapture { minimum: 200, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(browser.launches(), 3);
    assert_eq!(browser.closes(), 3);
}

#[tokio::test]
async fn test_second_attempt_succeeds() {
    let browser = FakeBrowser::new();
    browser.serve(
        ENTRY_URL,
        vec![
            Visit::Document("<p>Loading…</p>".to_string()),
            Visit::Document(CHARIZARD_PAGE.to_string()),
        ],
    );
    let engine = FetchEngine::new(browser.launcher(), fast_config(2));

    let html = engine.fetch_document(ENTRY_URL, "6").await.unwrap();

    assert!(html.contains("Charizard"));
    assert_eq!(browser.launches(), 2);
    assert_eq!(browser.closes(), 2);
}

#[tokio::test]
async fn test_navigation_error_is_retried() {
    let browser = FakeBrowser::new();
    browser.serve(
        ENTRY_URL,
        vec![Visit::NavigationError, Visit::Document(CHARIZARD_PAGE.to_string())],
    );
    let engine = FetchEngine::new(browser.launcher(), fast_config(2));

    assert_ok!(engine.fetch_document(ENTRY_URL, "6").await);
    assert_eq!(browser.visited(), vec![ENTRY_URL, ENTRY_URL]);
}

#[tokio::test]
async fn test_launch_failure_consumes_an_attempt() {
    let browser = FakeBrowser::new();
    browser.serve(ENTRY_URL, vec![Visit::Document(CHARIZARD_PAGE.to_string())]);
    browser.fail_next_launches(1);
    let engine = FetchEngine::new(browser.launcher(), fast_config(2));

    assert_ok!(engine.fetch_document(ENTRY_URL, "6").await);
    assert_eq!(browser.launches(), 2);
    // Only the session that actually opened gets closed
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let browser = FakeBrowser::new();
    browser.serve(ENTRY_URL, vec![Visit::NavigationError]);
    let engine = FetchEngine::new(browser.launcher(), fast_config(1));

    let err = engine.fetch_document(ENTRY_URL, "6").await.unwrap_err();
    assert!(matches!(err, FetchError::AttemptsExhausted { attempts: 1, .. }));
    assert_eq!(browser.launches(), 1);
}

#[tokio::test]
async fn test_successful_capture_is_snapshotted() {
    let dir = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    browser.serve(ENTRY_URL, vec![Visit::Document(CHARIZARD_PAGE.to_string())]);
    let engine = FetchEngine::new(browser.launcher(), fast_config(2))
        .with_snapshots(SnapshotStore::new(dir.path().join("raw_html")));

    engine.fetch_document(ENTRY_URL, "6").await.unwrap();

    let saved = tokio::fs::read_to_string(dir.path().join("raw_html").join("6.html"))
        .await
        .unwrap();
    assert_eq!(saved, CHARIZARD_PAGE);
}

#[tokio::test]
async fn test_failed_fetch_writes_no_snapshot() {
    let dir = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    browser.serve(ENTRY_URL, vec![Visit::NavigationError]);
    let engine = FetchEngine::new(browser.launcher(), fast_config(2))
        .with_snapshots(SnapshotStore::new(dir.path()));

    assert_err!(engine.fetch_document(ENTRY_URL, "6").await);
    assert!(!dir.path().join("6.html").exists());
}

#[tokio::test]
async fn test_invalid_url_is_rejected_without_launching() {
    let browser = FakeBrowser::new();
    let engine = FetchEngine::new(browser.launcher(), fast_config(3));

    let err = engine.fetch_document("not a url", "x").await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidUrl { .. }));
    assert_eq!(err.url(), "not a url");
    assert_eq!(browser.launches(), 0);
}

#[tokio::test]
async fn test_missing_content_marker_still_captures() {
    let slow_render = format!(
        "<html><body><h1 class=\"title\">Charizard</h1><div>{}</div></body></html>",
        "<span>rendering</span>".repeat(20)
    );
    assert!(slow_render.len() >= 200);
    assert!(!slow_render.contains("font-logo"));

    let browser = FakeBrowser::new();
    browser.serve(ENTRY_URL, vec![Visit::Document(slow_render.clone())]);
    let engine = FetchEngine::new(browser.launcher(), fast_config(3));

    let html = assert_ok!(engine.fetch_document(ENTRY_URL, "6").await);

    assert_eq!(html, slow_render);
    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.closes(), 1);
}
