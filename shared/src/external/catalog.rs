//! Catalog object wire types

use serde::{Deserialize, Serialize};

/// The only catalog object type the reconciliation engine tracks
pub const OBJECT_TYPE_ITEM: &str = "ITEM";

/// A versioned object in the external catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogObject {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    /// Optimistic concurrency token; writes must echo the latest value
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_data: Option<CatalogItemData>,
}

impl CatalogObject {
    pub fn is_item(&self) -> bool {
        self.object_type == OBJECT_TYPE_ITEM
    }

    /// First variation of the item, if any
    pub fn primary_variation(&self) -> Option<&CatalogVariation> {
        self.item_data.as_ref().and_then(|d| d.variations.first())
    }

    pub fn name(&self) -> &str {
        self.item_data.as_ref().map(|d| d.name.as_str()).unwrap_or_default()
    }
}

/// Item payload nested in a catalog object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub variations: Vec<CatalogVariation>,
}

/// Sellable variation of a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogVariation {
    pub id: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub sku: Option<String>,
    /// Price in minor currency units
    #[serde(default)]
    pub price_cents: Option<i64>,
}

/// Price update pushed to the external catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemUpdate {
    pub item_id: String,
    pub variation_id: String,
    /// Version token the caller last observed; stale values are rejected
    pub version: i64,
    pub price_cents: i64,
}
