//! External commerce platform client
//!
//! [`CommerceApi`] is the seam the reconcilers depend on; tests substitute
//! a mock, production wires in the reqwest-backed [`CommerceClient`].

mod client;

pub use client::CommerceClient;

use async_trait::async_trait;
use shared::external::{CatalogItemUpdate, CatalogObject, InventoryCount, InventorySet};
use thiserror::Error;

/// Errors from the commerce API call layer
#[derive(Debug, Error)]
pub enum CommerceError {
    #[error("commerce API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("commerce API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The write carried a version token older than the catalog's current
    /// one; the caller must re-read before retrying
    #[error("catalog version is stale for item {item_id}")]
    VersionConflict { item_id: String },

    #[error("unexpected commerce API response: {0}")]
    Decode(String),
}

/// Calls against the external commerce platform
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// List every ITEM object in the external catalog
    async fn list_catalog_items(&self) -> Result<Vec<CatalogObject>, CommerceError>;

    /// Fetch one catalog object by id; `None` when it does not exist
    async fn get_catalog_item(&self, id: &str) -> Result<Option<CatalogObject>, CommerceError>;

    /// Push a price update; returns the new version token
    async fn update_catalog_item(&self, update: &CatalogItemUpdate) -> Result<i64, CommerceError>;

    /// Batched inventory counts for the given variations at one location
    async fn get_inventory_counts(
        &self,
        variation_ids: &[String],
        location_id: &str,
    ) -> Result<Vec<InventoryCount>, CommerceError>;

    /// Overwrite the physical count for one variation
    async fn set_inventory_quantity(&self, set: &InventorySet) -> Result<(), CommerceError>;

    /// Attach an image to a catalog item; returns the hosted image URL
    async fn upload_item_image(
        &self,
        item_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, CommerceError>;
}
