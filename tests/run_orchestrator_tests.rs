//! Detail run tests: combination, resumability and per-entry failure isolation

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{CHARIZARD_PAGE, FakeFetcher};
use pokebase_scraper_lib::application::{RunError, RunOrchestrator};
use pokebase_scraper_lib::domain::{CatalogDocument, CatalogRecord, CombinedRecord, Variant};
use pokebase_scraper_lib::infrastructure::parsing::DetailParser;
use pokebase_scraper_lib::infrastructure::record_store::{JsonFileStore, write_pretty_json};
use tempfile::TempDir;

const CHARIZARD_URL: &str = "https://pokebase.app/pokemon-go/pokemon/6";
const VENUSAUR_URL: &str = "https://pokebase.app/pokemon-go/pokemon/3";

fn entry(name: &str, url: Option<&str>) -> CatalogRecord {
    CatalogRecord {
        name: Some(name.to_string()),
        url: url.map(str::to_string),
        image: Some("https://pokebase.app/img/pokemon/6.png".to_string()),
        lvl50: Some("3266".to_string()),
        tier: Some("A".to_string()),
        ..Default::default()
    }
}

fn orchestrator(fetcher: &FakeFetcher, output_dir: &std::path::Path) -> RunOrchestrator {
    RunOrchestrator::new(
        Arc::new(fetcher.clone()),
        Arc::new(DetailParser::new().unwrap()),
        Arc::new(JsonFileStore::new(output_dir)),
        Duration::ZERO,
    )
}

fn read_record(path: &std::path::Path) -> CombinedRecord {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_entry_is_combined_and_saved() {
    let dir = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new().with_document(CHARIZARD_URL, CHARIZARD_PAGE);
    let catalog = CatalogDocument::new(vec![entry("Charizard", Some(CHARIZARD_URL))]);

    let summary = orchestrator(&fetcher, dir.path()).run(&catalog).await;

    assert_eq!((summary.success, summary.failed, summary.skipped, summary.total), (1, 0, 0, 1));

    let record = read_record(&dir.path().join("6.json"));
    assert_eq!(record.list_meta, catalog.results[0]);
    assert_eq!(record.detail.name, "Charizard");
    assert_eq!(record.detail.variant, Variant::Normal);
    assert_eq!(record.detail.dex.as_deref(), Some("006"));
    assert_eq!(record.detail.types, vec!["Fire", "Flying"]);
    assert_eq!(record.detail.cp.lvl50.as_deref(), Some("3266"));
    assert_eq!(record.detail.cp.lvl15.as_deref(), Some("1083"));
    assert_eq!(record.detail.fast_moves.len(), 2);
    assert_eq!(record.detail.charge_moves[0].damage.as_deref(), Some("110"));
    assert_eq!(record.detail.dynamax_moves, vec!["Max Flare", "Max Airstream"]);
    assert_eq!(record.detail.weak_to.len(), 3);
    assert_eq!(record.detail.resistant_to[1].multiplier, "0.39x");
    assert_eq!(record.detail.evolution_tree.len(), 3);
    assert_eq!(
        record.detail.sprites.go_shiny.as_deref(),
        Some("https://pokebase.app/img/go/6-shiny.png")
    );
}

#[tokio::test]
async fn test_second_run_fetches_nothing() {
    let dir = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new().with_document(CHARIZARD_URL, CHARIZARD_PAGE);
    let catalog = CatalogDocument::new(vec![entry("Charizard", Some(CHARIZARD_URL))]);
    let run = orchestrator(&fetcher, dir.path());

    run.run(&catalog).await;
    let first_bytes = std::fs::read(dir.path().join("6.json")).unwrap();
    let second = run.run(&catalog).await;

    assert_eq!((second.success, second.skipped), (0, 1));
    assert_eq!(fetcher.calls().len(), 1);
    assert_eq!(std::fs::read(dir.path().join("6.json")).unwrap(), first_bytes);
}

#[tokio::test]
async fn test_entry_without_url_is_failed_without_fetching() {
    let dir = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new().with_document(CHARIZARD_URL, CHARIZARD_PAGE);
    let catalog = CatalogDocument::new(vec![
        entry("Nameless", None),
        entry("Charizard", Some(CHARIZARD_URL)),
    ]);

    let summary = orchestrator(&fetcher, dir.path()).run(&catalog).await;

    assert_eq!((summary.success, summary.failed, summary.total), (1, 1, 2));
    assert_eq!(fetcher.calls(), vec![CHARIZARD_URL.to_string()]);
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new().with_document(CHARIZARD_URL, CHARIZARD_PAGE);
    let catalog = CatalogDocument::new(vec![
        entry("Venusaur", Some(VENUSAUR_URL)),
        entry("Charizard", Some(CHARIZARD_URL)),
    ]);

    let summary = orchestrator(&fetcher, dir.path()).run(&catalog).await;

    assert_eq!((summary.success, summary.failed), (1, 1));
    assert_eq!(fetcher.calls().len(), 2);
    assert!(!dir.path().join("3.json").exists());
    assert!(dir.path().join("6.json").exists());
}

#[tokio::test]
async fn test_catalog_file_drives_the_run() {
    let dir = TempDir::new().unwrap();
    let catalog_file = dir.path().join("data").join("pokemon_list.json");
    let catalog = CatalogDocument::new(vec![entry("Charizard", Some(CHARIZARD_URL))]);
    write_pretty_json(&catalog_file, &catalog).await.unwrap();

    let fetcher = FakeFetcher::new().with_document(CHARIZARD_URL, CHARIZARD_PAGE);
    let summary = orchestrator(&fetcher, &dir.path().join("out"))
        .run_catalog_file(&catalog_file)
        .await
        .unwrap();

    assert_eq!(summary.success, 1);
    assert!(dir.path().join("out").join("6.json").exists());
}

#[tokio::test]
async fn test_missing_catalog_halts_the_run() {
    let dir = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new();

    let result = orchestrator(&fetcher, dir.path())
        .run_catalog_file(&dir.path().join("missing.json"))
        .await;

    assert!(matches!(result, Err(RunError::CatalogUnavailable { .. })));
    assert!(fetcher.calls().is_empty());
}
