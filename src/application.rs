//! Application layer module
//!
//! Use cases that drive the infrastructure: the catalog pass and the
//! detail run, plus the validated settings they share.

pub mod catalog_use_case;
pub mod run_orchestrator;
pub mod validated_config;

pub use catalog_use_case::{CatalogError, CatalogUseCase};
pub use run_orchestrator::{EntryOutcome, RunError, RunOrchestrator, RunSummary};
pub use validated_config::{ValidatedFetchConfig, ValidatedRunConfig};
