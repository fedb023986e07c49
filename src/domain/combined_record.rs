use serde::{Deserialize, Serialize};

use super::catalog_record::CatalogRecord;
use super::detail_record::DetailRecord;

/// Unit persisted per catalog entry: the listing row plus its detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub list_meta: CatalogRecord,
    pub detail: DetailRecord,
}

impl CombinedRecord {
    pub fn new(list_meta: CatalogRecord, detail: DetailRecord) -> Self {
        Self { list_meta, detail }
    }
}
