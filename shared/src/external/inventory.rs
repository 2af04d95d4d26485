//! Inventory count wire types

use serde::{Deserialize, Serialize};

/// A point-in-time stock count for one variation at one location.
///
/// The commerce API transmits quantities as decimal strings; absent or
/// malformed values are treated as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCount {
    pub catalog_object_id: String,
    pub location_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl InventoryCount {
    pub fn quantity_or_zero(&self) -> i64 {
        parse_quantity(self.quantity.as_deref())
    }
}

/// Parse a wire quantity string, defaulting to 0 for missing or
/// non-numeric values
pub fn parse_quantity(raw: Option<&str>) -> i64 {
    raw.and_then(|q| q.trim().parse().ok()).unwrap_or(0)
}

/// Physical count overwrite pushed to the external inventory API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySet {
    pub variation_id: String,
    pub location_id: String,
    pub quantity: i64,
}
