//! Webhook event envelope

use serde::{Deserialize, Serialize};

/// Catalog changed; the payload names no object, a rescan is required
pub const EVENT_CATALOG_VERSION_UPDATED: &str = "catalog.version.updated";
/// Inventory counts changed for one or more variations
pub const EVENT_INVENTORY_COUNT_UPDATED: &str = "inventory.count.updated";

/// Notification delivered by the commerce platform.
///
/// The envelope is treated as a hint of what changed, never as the change
/// itself; handlers re-read current state from the commerce API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub event_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub data: WebhookData,
}

/// `data` section of a webhook event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookData {
    /// Catalog object id, when the event concerns a single object
    #[serde(default)]
    pub id: Option<String>,
    /// Event-type-specific payload
    #[serde(default)]
    pub object: Option<serde_json::Value>,
}

/// One entry of an `inventory.count.updated` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCountPayload {
    pub catalog_object_id: String,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl WebhookEvent {
    /// Inventory counts embedded in an inventory event; empty when the
    /// payload carries none or does not parse
    pub fn inventory_counts(&self) -> Vec<InventoryCountPayload> {
        self.data
            .object
            .as_ref()
            .and_then(|object| object.get("inventory_counts"))
            .and_then(|counts| serde_json::from_value(counts.clone()).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_event() {
        let json = r#"{
            "merchant_id": "m-1",
            "type": "catalog.version.updated",
            "event_id": "evt-1",
            "created_at": "2026-08-30T10:00:00Z",
            "data": {}
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EVENT_CATALOG_VERSION_UPDATED);
        assert_eq!(event.event_id, "evt-1");
        assert!(event.data.id.is_none());
        assert!(event.inventory_counts().is_empty());
    }

    #[test]
    fn test_inventory_counts_extraction() {
        let json = r#"{
            "type": "inventory.count.updated",
            "event_id": "evt-2",
            "data": {
                "object": {
                    "inventory_counts": [
                        {"catalog_object_id": "ext-var-1", "location_id": "loc-1", "quantity": "9"},
                        {"catalog_object_id": "ext-var-2", "state": "IN_STOCK"}
                    ]
                }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        let counts = event.inventory_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].catalog_object_id, "ext-var-1");
        assert_eq!(counts[0].quantity.as_deref(), Some("9"));
        assert!(counts[1].quantity.is_none());
    }

    #[test]
    fn test_unknown_event_type_still_parses() {
        let json = r#"{"type": "payout.created", "event_id": "evt-3"}"#;
        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "payout.created");
    }
}
