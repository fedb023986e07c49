//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for CSS selectors, the listing column layout
//! and the literal markers the extractors depend on.

use serde::{Deserialize, Serialize};

use crate::domain::catalog_record::MetricField;
use crate::domain::constants::{capture, site};

/// Main parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Origin prepended to relative entry links
    pub site_origin: String,

    /// Marker separating pages inside a listing document set
    pub page_break_marker: String,

    /// Listing page selectors
    pub listing: ListingSelectors,

    /// Positional metric columns of a listing row
    pub columns: MetricColumns,

    /// Detail page selectors
    pub detail: DetailSelectors,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            site_origin: site::ORIGIN.to_string(),
            page_break_marker: capture::PAGE_BREAK_MARKER.to_string(),
            listing: ListingSelectors::default(),
            columns: MetricColumns::default(),
            detail: DetailSelectors::default(),
        }
    }
}

/// CSS selectors for listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One element per catalog row
    pub row: String,

    /// Cells of a row, in column order
    pub cell: String,

    /// Entry link inside the first cell
    pub anchor: String,

    /// Preferred (truncation-styled) name element inside the anchor
    pub name_truncated: String,

    /// Plain name element, used when the truncated one is absent
    pub name_plain: String,

    /// Sprite inside the anchor
    pub image: String,

    /// Pagination control whose text reads "Page X of N"
    pub pagination: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            row: "div.table-row-group > div.table-row".to_string(),
            cell: "span.table-cell".to_string(),
            anchor: "a".to_string(),
            name_truncated: "span.font-semibold div.truncate".to_string(),
            name_plain: "span.font-semibold".to_string(),
            image: "img".to_string(),
            pagination: "div.flex.items-center.gap-1".to_string(),
        }
    }
}

/// Cell index of each listing metric.
///
/// The listing has no labelled header we can anchor to, so the mapping is
/// configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricColumns {
    pub lvl50: usize,
    pub gl: usize,
    pub ul: usize,
    pub ml: usize,
    pub tier: usize,
    pub atk: usize,
    pub def: usize,
    pub sta: usize,
}

impl Default for MetricColumns {
    fn default() -> Self {
        Self {
            lvl50: 1,
            gl: 2,
            ul: 3,
            ml: 4,
            tier: 5,
            atk: 6,
            def: 7,
            sta: 8,
        }
    }
}

impl MetricColumns {
    pub fn index_of(&self, field: MetricField) -> usize {
        match field {
            MetricField::Lvl50 => self.lvl50,
            MetricField::Gl => self.gl,
            MetricField::Ul => self.ul,
            MetricField::Ml => self.ml,
            MetricField::Tier => self.tier,
            MetricField::Atk => self.atk,
            MetricField::Def => self.def,
            MetricField::Sta => self.sta,
        }
    }

    /// (field, cell index) pairs in listing order
    pub fn mapping(&self) -> Vec<(MetricField, usize)> {
        MetricField::ALL
            .iter()
            .map(|field| (*field, self.index_of(*field)))
            .collect()
    }
}

/// CSS selectors and labels for detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Heading that carries the display name; also the render-ready marker
    pub name: String,
    pub dex: String,
    pub image: String,
    pub sprite_images: String,
    pub type_icons: String,
    pub base_stats: String,
    pub cp_values: String,

    /// Element type searched for the matchup labels
    pub matchup_label_tag: String,
    pub weak_to_label: String,
    pub resistant_to_label: String,
    pub matchup_entry: String,
    pub matchup_part: String,

    /// Element type searched for the move-section headings
    pub section_heading_tag: String,
    pub section_container_tag: String,
    pub fast_moves_heading: String,
    pub charge_moves_heading: String,
    pub dynamax_moves_heading: String,
    pub move_entry: String,
    pub move_name: String,
    pub move_name_fallback: String,
    pub move_damage: String,
    pub dynamax_move_name: String,

    pub evolution_entry: String,
    pub evolution_name: String,
    pub evolution_image: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            name: "h1.font-logo".to_string(),
            dex: "div.top-3.right-3 span".to_string(),
            image: "div.h-60 img".to_string(),
            sprite_images: "div.flex.gap-2 img".to_string(),
            type_icons: "div.top-3.left-3 img".to_string(),
            base_stats: "div.grid.grid-cols-3 span.font-medium".to_string(),
            cp_values: ".font-mono.tabular-nums.font-semibold.text-sm".to_string(),

            matchup_label_tag: "span".to_string(),
            weak_to_label: "Weak to".to_string(),
            resistant_to_label: "Resistant to".to_string(),
            matchup_entry: "a.flex".to_string(),
            matchup_part: "span".to_string(),

            section_heading_tag: "h2".to_string(),
            section_container_tag: "div".to_string(),
            fast_moves_heading: "Fast".to_string(),
            charge_moves_heading: "Charge".to_string(),
            dynamax_moves_heading: "Dynamax".to_string(),
            move_entry: "a".to_string(),
            move_name: "span.flex-grow".to_string(),
            move_name_fallback: "span".to_string(),
            move_damage: "button".to_string(),
            dynamax_move_name: "div.text-sm".to_string(),

            evolution_entry: "div.flex.flex-col.gap-2 a".to_string(),
            evolution_name: "span.font-semibold".to_string(),
            evolution_image: "img".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_mapping_is_positional() {
        let mapping = MetricColumns::default().mapping();
        let indices: Vec<usize> = mapping.iter().map(|(_, idx)| *idx).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(mapping[0].0, MetricField::Lvl50);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let columns: MetricColumns = serde_json::from_str(r#"{"tier": 9}"#).unwrap();
        assert_eq!(columns.tier, 9);
        assert_eq!(columns.lvl50, 1);
    }
}
