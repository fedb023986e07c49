//! Domain module - records and pure rules of the scraper
//!
//! This module contains the record types produced by the extractors and the
//! rules that do not touch the browser or the filesystem: variant
//! classification, slug derivation and pagination parsing.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod catalog_record;
pub mod combined_record;
pub mod constants;
pub mod detail_record;
pub mod pagination;
pub mod slug;
pub mod variant;

pub use catalog_record::{CatalogDocument, CatalogRecord, MetricField};
pub use combined_record::CombinedRecord;
pub use detail_record::{
    BaseStats, CpTable, DetailRecord, EvolutionEntry, Move, SpriteKind, Sprites, TypeMultiplier,
};
pub use pagination::PageCount;
pub use slug::Slug;
pub use variant::Variant;
