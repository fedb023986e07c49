//! Pokebase Scraper - headless-browser extraction of Pokémon GO data
//!
//! Renders the pokebase.app catalog and entry pages in Chromium, parses the
//! rendered DOM into typed records and writes one JSON artifact per entry.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;
