//! Site characteristics and domain constants
//!
//! Fixed properties of the pokebase.app catalog that the extractors and the
//! fetch pipeline rely on. Values that operators may need to change live in
//! `infrastructure::config` and only default to these.

/// pokebase.app site characteristics
pub mod site {
    /// Origin prepended to relative entry links
    pub const ORIGIN: &str = "https://pokebase.app";

    /// Listing page for all Pokémon GO entries
    pub const LISTING_URL: &str = "https://pokebase.app/pokemon-go/pokemon";

    /// Query parameter used by the listing for pagination (1-based)
    pub const PAGE_QUERY_PARAM: &str = "page";

    /// Site page numbers use 1-based indexing
    pub const PAGE_NUMBERING_BASE: u32 = 1;
}

/// Document capture limits
pub mod capture {
    /// Captures shorter than this are treated as blank renders
    pub const MIN_DOCUMENT_LENGTH: usize = 200;

    /// Literal marker joining listing pages in snapshots and document sets
    pub const PAGE_BREAK_MARKER: &str = "<!--PAGE_BREAK-->";
}

/// CP table levels, highest level first
pub mod cp {
    pub const LEVEL_KEYS: [&str; 5] = ["lvl50", "lvl40", "lvl25", "lvl20", "lvl15"];
}

/// Timing defaults for the fetch pipeline
pub mod timing {
    /// Per-navigation timeout (milliseconds)
    pub const NAVIGATION_TIMEOUT_MS: u64 = 60_000;

    /// Timeout for the content marker of a detail page (milliseconds)
    pub const CONTENT_MARKER_TIMEOUT_MS: u64 = 8_000;

    /// Post-render grace period (seconds)
    pub const GRACE_PERIOD_SECS: f64 = 1.0;

    /// Delay between detail fetch attempts (seconds)
    pub const DETAIL_RETRY_DELAY_SECS: f64 = 1.0;

    /// Delay between listing fetch attempts (seconds)
    pub const LISTING_RETRY_DELAY_SECS: f64 = 2.0;

    /// Pause between catalog entries that issued a request (seconds)
    pub const POLITENESS_DELAY_SECS: f64 = 0.5;
}
