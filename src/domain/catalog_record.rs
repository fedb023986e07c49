use serde::{Deserialize, Serialize};

/// One row of the paginated listing.
///
/// Identity is `url`. Metric cells are read positionally, so every metric is
/// optional: a missing cell serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: Option<String>,
    pub url: Option<String>,
    /// Sprite address with the query string removed. Older catalogs use `img`.
    #[serde(alias = "img")]
    pub image: Option<String>,
    pub lvl50: Option<String>,
    pub gl: Option<String>,
    pub ul: Option<String>,
    pub ml: Option<String>,
    pub tier: Option<String>,
    pub atk: Option<String>,
    pub def: Option<String>,
    pub sta: Option<String>,
}

/// Metric fields in their listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    Lvl50,
    Gl,
    Ul,
    Ml,
    Tier,
    Atk,
    Def,
    Sta,
}

impl MetricField {
    pub const ALL: [MetricField; 8] = [
        MetricField::Lvl50,
        MetricField::Gl,
        MetricField::Ul,
        MetricField::Ml,
        MetricField::Tier,
        MetricField::Atk,
        MetricField::Def,
        MetricField::Sta,
    ];
}

impl CatalogRecord {
    /// Assign a metric slot by field
    pub fn set_metric(&mut self, field: MetricField, value: Option<String>) {
        let slot = match field {
            MetricField::Lvl50 => &mut self.lvl50,
            MetricField::Gl => &mut self.gl,
            MetricField::Ul => &mut self.ul,
            MetricField::Ml => &mut self.ml,
            MetricField::Tier => &mut self.tier,
            MetricField::Atk => &mut self.atk,
            MetricField::Def => &mut self.def,
            MetricField::Sta => &mut self.sta,
        };
        *slot = value;
    }

    pub fn metric(&self, field: MetricField) -> Option<&str> {
        match field {
            MetricField::Lvl50 => self.lvl50.as_deref(),
            MetricField::Gl => self.gl.as_deref(),
            MetricField::Ul => self.ul.as_deref(),
            MetricField::Ml => self.ml.as_deref(),
            MetricField::Tier => self.tier.as_deref(),
            MetricField::Atk => self.atk.as_deref(),
            MetricField::Def => self.def.as_deref(),
            MetricField::Sta => self.sta.as_deref(),
        }
    }
}

/// Catalog file envelope: `{ "results": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub results: Vec<CatalogRecord>,
}

impl CatalogDocument {
    pub fn new(results: Vec<CatalogRecord>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_img_key_is_accepted() {
        let json = r#"{"results":[{"name":"Bulbasaur","url":"https://pokebase.app/pokemon-go/pokemon/1","img":"https://cdn/x.png","lvl50":"1,260"}]}"#;
        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.results[0].image.as_deref(), Some("https://cdn/x.png"));
        assert_eq!(doc.results[0].lvl50.as_deref(), Some("1,260"));
        assert!(doc.results[0].sta.is_none());
    }

    #[test]
    fn test_missing_metrics_serialize_as_null() {
        let record = CatalogRecord {
            name: Some("Pikachu".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["tier"].is_null());
        assert_eq!(value["name"], "Pikachu");
    }

    #[test]
    fn test_set_metric_round_trip() {
        let mut record = CatalogRecord::default();
        for (i, field) in MetricField::ALL.iter().enumerate() {
            record.set_metric(*field, Some(i.to_string()));
        }
        assert_eq!(record.metric(MetricField::Lvl50), Some("0"));
        assert_eq!(record.metric(MetricField::Sta), Some("7"));
    }
}
