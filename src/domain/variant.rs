//! Structural variant of an entry, classified from its display name.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Normal,
    Mega,
    Gmax,
    Dmax,
    Shadow,
}

/// Prefix rules in priority order; first match wins.
const PREFIX_RULES: [(&str, Variant); 4] = [
    ("mega ", Variant::Mega),
    ("gigantamax ", Variant::Gmax),
    ("dynamax ", Variant::Dmax),
    ("shadow ", Variant::Shadow),
];

impl Variant {
    /// Classify a display name. Matching is case-insensitive.
    pub fn classify(name: &str) -> Self {
        let lowered = name.to_lowercase();
        PREFIX_RULES
            .iter()
            .find(|(prefix, _)| lowered.starts_with(prefix))
            .map_or(Variant::Normal, |(_, variant)| *variant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Normal => "normal",
            Variant::Mega => "mega",
            Variant::Gmax => "gmax",
            Variant::Dmax => "dmax",
            Variant::Shadow => "shadow",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
