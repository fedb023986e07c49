//! Detail parser for a single entry page
//!
//! Every variant (normal, mega, gmax, dmax, shadow) renders from the same
//! template. Each field is extracted on its own: a missing element leaves
//! that field null or empty and never aborts the record.

#![allow(clippy::uninlined_format_args)]

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::{DetailSelectors, ParsingConfig};
use super::dom::{
    attr, compile_selector, document_text, find_by_string, find_next, parent_element,
    select_text, stripped_text,
};
use super::{ContextualParser, DetailParseContext, ParsingResult};
use crate::domain::detail_record::{
    BaseStats, CpTable, DetailRecord, EvolutionEntry, Move, SpriteKind, Sprites, TypeMultiplier,
};
use crate::domain::variant::Variant;
use crate::utils::clean_image_attr;

/// Parser for entry detail pages
pub struct DetailParser {
    name_selector: Selector,
    dex_selector: Selector,
    image_selector: Selector,
    sprite_selector: Selector,
    type_selector: Selector,
    base_stats_selector: Selector,
    cp_selector: Selector,

    matchup_label_selector: Selector,
    matchup_entry_selector: Selector,
    matchup_part_selector: Selector,

    heading_selector: Selector,
    move_entry_selector: Selector,
    move_name_selector: Selector,
    move_name_fallback_selector: Selector,
    move_damage_selector: Selector,
    dynamax_name_selector: Selector,

    evolution_entry_selector: Selector,
    evolution_name_selector: Selector,
    evolution_image_selector: Selector,

    labels: SectionLabels,
}

/// Literal texts searched for in labels and headings (case-sensitive)
#[derive(Debug, Clone)]
struct SectionLabels {
    weak_to: String,
    resistant_to: String,
    fast: String,
    charge: String,
    dynamax: String,
    container_tag: String,
}

impl DetailParser {
    /// Create a detail parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let s: &DetailSelectors = &config.detail;
        Ok(Self {
            name_selector: compile_selector("detail.name", &s.name)?,
            dex_selector: compile_selector("detail.dex", &s.dex)?,
            image_selector: compile_selector("detail.image", &s.image)?,
            sprite_selector: compile_selector("detail.sprite_images", &s.sprite_images)?,
            type_selector: compile_selector("detail.type_icons", &s.type_icons)?,
            base_stats_selector: compile_selector("detail.base_stats", &s.base_stats)?,
            cp_selector: compile_selector("detail.cp_values", &s.cp_values)?,

            matchup_label_selector: compile_selector("detail.matchup_label_tag", &s.matchup_label_tag)?,
            matchup_entry_selector: compile_selector("detail.matchup_entry", &s.matchup_entry)?,
            matchup_part_selector: compile_selector("detail.matchup_part", &s.matchup_part)?,

            heading_selector: compile_selector("detail.section_heading_tag", &s.section_heading_tag)?,
            move_entry_selector: compile_selector("detail.move_entry", &s.move_entry)?,
            move_name_selector: compile_selector("detail.move_name", &s.move_name)?,
            move_name_fallback_selector: compile_selector(
                "detail.move_name_fallback",
                &s.move_name_fallback,
            )?,
            move_damage_selector: compile_selector("detail.move_damage", &s.move_damage)?,
            dynamax_name_selector: compile_selector("detail.dynamax_move_name", &s.dynamax_move_name)?,

            evolution_entry_selector: compile_selector("detail.evolution_entry", &s.evolution_entry)?,
            evolution_name_selector: compile_selector("detail.evolution_name", &s.evolution_name)?,
            evolution_image_selector: compile_selector("detail.evolution_image", &s.evolution_image)?,

            labels: SectionLabels {
                weak_to: s.weak_to_label.clone(),
                resistant_to: s.resistant_to_label.clone(),
                fast: s.fast_moves_heading.clone(),
                charge: s.charge_moves_heading.clone(),
                dynamax: s.dynamax_moves_heading.clone(),
                container_tag: s.section_container_tag.clone(),
            },
        })
    }

    /// Parse a raw rendered document
    pub fn parse_document(&self, document: &str, context: &DetailParseContext) -> ParsingResult<DetailRecord> {
        let html = Html::parse_document(document);
        self.parse_with_context(&html, context)
    }

    fn texts(&self, html: &Html, selector: &Selector) -> Vec<String> {
        html.select(selector).map(stripped_text).collect()
    }

    fn extract_sprites(&self, html: &Html, default: Option<String>) -> Sprites {
        let mut sprites = Sprites {
            default,
            ..Default::default()
        };

        for img in html.select(&self.sprite_selector) {
            let label = img.value().attr("alt").unwrap_or_default();
            if let Some(kind) = SpriteKind::from_label(label) {
                sprites.set(kind, clean_image_attr(img.value().attr("src")));
            }
        }
        sprites
    }

    /// Entries under the parent of the first label span containing `label`
    fn extract_matchups(&self, html: &Html, label: &str) -> Vec<TypeMultiplier> {
        let Some(container) = find_by_string(html, &self.matchup_label_selector, label)
            .and_then(parent_element)
        else {
            debug!("[Detail] No '{}' section", label);
            return Vec::new();
        };

        container
            .select(&self.matchup_entry_selector)
            .filter_map(|entry| {
                let parts: Vec<ElementRef<'_>> = entry.select(&self.matchup_part_selector).collect();
                match parts.as_slice() {
                    [first, .., last] => Some(TypeMultiplier {
                        type_name: stripped_text(*first),
                        multiplier: stripped_text(*last),
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    /// Anchors of the first container following the heading that contains `label`
    fn section_entries<'a>(&self, html: &'a Html, label: &str) -> Vec<ElementRef<'a>> {
        find_by_string(html, &self.heading_selector, label)
            .and_then(|heading| find_next(html, heading, &self.labels.container_tag))
            .map(|container| container.select(&self.move_entry_selector).collect())
            .unwrap_or_else(|| {
                debug!("[Detail] No '{}' section", label);
                Vec::new()
            })
    }

    fn extract_moves(&self, html: &Html, label: &str) -> Vec<Move> {
        self.section_entries(html, label)
            .into_iter()
            .map(|entry| Move {
                name: select_text(entry, &self.move_name_selector)
                    .or_else(|| select_text(entry, &self.move_name_fallback_selector)),
                damage: entry.select(&self.move_damage_selector).last().map(stripped_text),
            })
            .collect()
    }

    fn extract_dynamax_moves(&self, html: &Html) -> Vec<String> {
        self.section_entries(html, &self.labels.dynamax)
            .into_iter()
            .filter_map(|entry| select_text(entry, &self.dynamax_name_selector))
            .collect()
    }

    fn extract_evolution_tree(&self, html: &Html) -> Vec<EvolutionEntry> {
        html.select(&self.evolution_entry_selector)
            .map(|entry| EvolutionEntry {
                name: select_text(entry, &self.evolution_name_selector),
                image: entry
                    .select(&self.evolution_image_selector)
                    .next()
                    .and_then(|img| clean_image_attr(img.value().attr("src"))),
            })
            .collect()
    }
}

impl ContextualParser for DetailParser {
    type Output = DetailRecord;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let name = document_text(html, &self.name_selector).unwrap_or_default();
        let variant = Variant::classify(&name);

        let dex = document_text(html, &self.dex_selector).map(|text| text.replace('#', ""));

        let image = html
            .select(&self.image_selector)
            .next()
            .and_then(|img| clean_image_attr(attr(img, "src").as_deref()));
        let sprites = self.extract_sprites(html, image.clone());

        let types = html
            .select(&self.type_selector)
            .filter_map(|icon| attr(icon, "alt"))
            .collect();

        let stat_values = self.texts(html, &self.base_stats_selector);
        let base_stats = BaseStats::from_slots(&stat_values);
        if base_stats.is_empty() && !stat_values.is_empty() {
            debug!(
                "[Detail] Expected {} base stats, found {} on {}",
                BaseStats::SLOTS,
                stat_values.len(),
                context.url
            );
        }

        let cp = CpTable::from_document_order(&self.texts(html, &self.cp_selector));

        let record = DetailRecord {
            name,
            variant,
            dex,
            image,
            sprites,
            types,
            base_stats,
            cp,
            weak_to: self.extract_matchups(html, &self.labels.weak_to),
            resistant_to: self.extract_matchups(html, &self.labels.resistant_to),
            fast_moves: self.extract_moves(html, &self.labels.fast),
            charge_moves: self.extract_moves(html, &self.labels.charge),
            dynamax_moves: self.extract_dynamax_moves(html),
            evolution_tree: self.extract_evolution_tree(html),
        };

        debug!(
            "[Detail] Parsed '{}' ({}) from {}: {} fast, {} charge, {} evolutions",
            record.name,
            record.variant,
            context.url,
            record.fast_moves.len(),
            record.charge_moves.len(),
            record.evolution_tree.len()
        );

        Ok(record)
    }
}
