#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use pokebase_scraper_lib::application::{
    CatalogUseCase, RunOrchestrator, ValidatedFetchConfig, ValidatedRunConfig,
};
use pokebase_scraper_lib::infrastructure::config::{AppConfig, ConfigManager};
use pokebase_scraper_lib::infrastructure::logging::{init_logging_with_config, log_system_info};
use pokebase_scraper_lib::infrastructure::{
    CatalogParser, ChromiumLauncher, DetailParser, FetchEngine, JsonFileStore, PaginationParser,
    SnapshotStore,
};

#[derive(Parser)]
#[command(
    name = "pokebase-scraper",
    version,
    about = "Scrape the pokebase.app Pokémon GO catalog and entry pages"
)]
struct Cli {
    /// Configuration file (JSON or TOML). Default: <config dir>/pokebase-scraper/config.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every listing page and write the catalog file
    Catalog(CatalogArgs),
    /// Fetch and extract every catalog entry not yet present in the output directory
    Details(DetailsArgs),
    /// Write the effective configuration to the config file
    InitConfig,
}

#[derive(Parser)]
struct CatalogArgs {
    /// Listing URL (default: run.listing_url)
    #[arg(long, value_name = "URL")]
    listing_url: Option<String>,

    /// Catalog file to write (default: run.catalog_file)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct DetailsArgs {
    /// Catalog file to read (default: run.catalog_file)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Directory for per-entry JSON files (default: run.output_dir)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::with_default_path(),
    };
    let mut config = manager
        .load_config()
        .with_context(|| format!("Failed to load configuration from {:?}", manager.config_path()))?;

    if cli.headed {
        config.scraper.headless = false;
    }

    init_logging_with_config(config.logging.clone())?;
    log_system_info();

    match cli.command {
        Commands::Catalog(args) => run_catalog(&config, args).await,
        Commands::Details(args) => run_details(&config, args).await,
        Commands::InitConfig => {
            manager.save_config(&config).await?;
            Ok(())
        }
    }
}

fn build_engine(config: &AppConfig, run: &ValidatedRunConfig) -> FetchEngine {
    let engine = FetchEngine::new(
        Arc::new(ChromiumLauncher::new()),
        ValidatedFetchConfig::from_app_config(config),
    );
    match &run.snapshot_dir {
        Some(dir) => engine.with_snapshots(SnapshotStore::new(dir.clone())),
        None => engine,
    }
}

async fn run_catalog(config: &AppConfig, args: CatalogArgs) -> Result<()> {
    let run = ValidatedRunConfig::from_app_config(config);
    let listing_url = args.listing_url.unwrap_or_else(|| run.listing_url.clone());
    let catalog_file = args.output.unwrap_or_else(|| run.catalog_file.clone());

    let engine = build_engine(config, &run);
    let use_case = CatalogUseCase::new(
        &engine,
        PaginationParser::with_config(&config.parsing.listing)?,
        CatalogParser::with_config(&config.parsing)?,
        &config.parsing.page_break_marker,
    );

    info!("[Catalog] Start: {} → {:?}", listing_url, catalog_file);
    let report = use_case
        .execute(&listing_url, &catalog_file)
        .await
        .with_context(|| format!("Catalog pass failed for {}", listing_url))?;

    info!(
        "[Catalog] Done: {} records from {} pages",
        report.total_records(),
        report.page_count()
    );
    Ok(())
}

async fn run_details(config: &AppConfig, args: DetailsArgs) -> Result<()> {
    let run = ValidatedRunConfig::from_app_config(config);
    let catalog_file = args.catalog.unwrap_or_else(|| run.catalog_file.clone());
    let output_dir = args.output_dir.unwrap_or_else(|| run.output_dir.clone());

    let orchestrator = RunOrchestrator::new(
        Arc::new(build_engine(config, &run)),
        Arc::new(DetailParser::with_config(&config.parsing)?),
        Arc::new(JsonFileStore::new(output_dir)),
        run.politeness_delay,
    );

    orchestrator.run_catalog_file(&catalog_file).await?;
    Ok(())
}
