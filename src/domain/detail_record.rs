//! Per-entry detail record produced by the detail extractor.
//!
//! Every field except `name` and `variant` may be absent. Fixed-cardinality
//! groups (base stats, CP table) are modelled as explicit slots so that a
//! malformed group degrades to all-null instead of misaligned values.

use serde::{Deserialize, Serialize};

use super::constants::cp::LEVEL_KEYS;
use super::variant::Variant;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub name: String,
    pub variant: Variant,
    pub dex: Option<String>,
    pub image: Option<String>,
    pub sprites: Sprites,
    pub types: Vec<String>,
    pub base_stats: BaseStats,
    pub cp: CpTable,
    pub weak_to: Vec<TypeMultiplier>,
    pub resistant_to: Vec<TypeMultiplier>,
    pub fast_moves: Vec<Move>,
    pub charge_moves: Vec<Move>,
    pub dynamax_moves: Vec<String>,
    pub evolution_tree: Vec<EvolutionEntry>,
}

/// Sprite kind → address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub default: Option<String>,
    pub go: Option<String>,
    pub go_shiny: Option<String>,
    pub shuffle: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Go,
    GoShiny,
    Shuffle,
}

impl SpriteKind {
    /// Classify an alternate-image label: contains "shiny", exactly "go",
    /// contains "shuffle". Labels are compared lower-cased.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("shiny") {
            Some(SpriteKind::GoShiny)
        } else if label == "go" {
            Some(SpriteKind::Go)
        } else if label.contains("shuffle") {
            Some(SpriteKind::Shuffle)
        } else {
            None
        }
    }
}

impl Sprites {
    pub fn set(&mut self, kind: SpriteKind, src: Option<String>) {
        match kind {
            SpriteKind::Go => self.go = src,
            SpriteKind::GoShiny => self.go_shiny = src,
            SpriteKind::Shuffle => self.shuffle = src,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub attack: Option<String>,
    pub defense: Option<String>,
    pub stamina: Option<String>,
}

impl BaseStats {
    pub const SLOTS: usize = 3;

    /// Exactly three values in attack/defense/stamina order, otherwise all null.
    pub fn from_slots(values: &[String]) -> Self {
        match values {
            [attack, defense, stamina] => Self {
                attack: Some(attack.clone()),
                defense: Some(defense.clone()),
                stamina: Some(stamina.clone()),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attack.is_none() && self.defense.is_none() && self.stamina.is_none()
    }
}

/// CP thresholds keyed by level, highest level first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpTable {
    pub lvl50: Option<String>,
    pub lvl40: Option<String>,
    pub lvl25: Option<String>,
    pub lvl20: Option<String>,
    pub lvl15: Option<String>,
}

impl CpTable {
    /// Pair level keys positionally with values found in document order.
    /// Surplus values are ignored; missing trailing keys stay null.
    pub fn from_document_order(values: &[String]) -> Self {
        let mut slots: [Option<String>; LEVEL_KEYS.len()] = Default::default();
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = Some(value.clone());
        }
        let [lvl50, lvl40, lvl25, lvl20, lvl15] = slots;
        Self {
            lvl50,
            lvl40,
            lvl25,
            lvl20,
            lvl15,
        }
    }

}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMultiplier {
    #[serde(rename = "type")]
    pub type_name: String,
    pub multiplier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: Option<String>,
    pub damage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionEntry {
    pub name: Option<String>,
    pub image: Option<String>,
}
