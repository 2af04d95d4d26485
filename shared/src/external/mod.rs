//! Wire types for the external commerce platform
//!
//! Shapes mirror the commerce API's JSON payloads: catalog objects with
//! nested variations, inventory counts with string quantities, and the
//! webhook event envelope.

pub mod catalog;
pub mod inventory;
pub mod webhook;

pub use catalog::{CatalogItemData, CatalogItemUpdate, CatalogObject, CatalogVariation};
pub use inventory::{InventoryCount, InventorySet};
pub use webhook::{InventoryCountPayload, WebhookData, WebhookEvent};

/// Identifier of the commerce platform this deployment syncs with.
///
/// The data model is keyed by system so a second platform can be added
/// without a schema change; exactly one is implemented today.
pub const COMMERCE_SYSTEM: &str = "commerce";
