//! Shared test fixtures: in-memory database, mock commerce API, row helpers

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::external::{
    CatalogItemData, CatalogItemUpdate, CatalogObject, CatalogVariation, InventoryCount,
    InventorySet,
};
use sqlx::SqlitePool;
use sync_server::db;
use sync_server::external::{CommerceApi, CommerceError};
use sync_server::{AppState, Config};

pub const TEST_SIGNATURE_KEY: &str = "test-signature-key";
pub const TEST_NOTIFICATION_URL: &str = "http://localhost:8080/webhooks/commerce";
pub const TEST_LOCATION: &str = "loc-1";

/// In-memory stand-in for the external commerce platform.
///
/// Catalog and counts are plain vectors the test mutates directly; writes
/// through the API are recorded and applied so later reads observe them.
#[derive(Default)]
pub struct MockCommerce {
    pub catalog: Mutex<Vec<CatalogObject>>,
    pub counts: Mutex<Vec<InventoryCount>>,
    pub pushed_prices: Mutex<Vec<CatalogItemUpdate>>,
    pub pushed_inventory: Mutex<Vec<InventorySet>>,
    pub fail_listing: Mutex<bool>,
}

impl MockCommerce {
    pub fn set_catalog(&self, objects: Vec<CatalogObject>) {
        *self.catalog.lock().unwrap() = objects;
    }

    pub fn set_counts(&self, counts: Vec<InventoryCount>) {
        *self.counts.lock().unwrap() = counts;
    }

    pub fn fail_listing(&self, fail: bool) {
        *self.fail_listing.lock().unwrap() = fail;
    }
}

#[async_trait]
impl CommerceApi for MockCommerce {
    async fn list_catalog_items(&self) -> Result<Vec<CatalogObject>, CommerceError> {
        if *self.fail_listing.lock().unwrap() {
            return Err(CommerceError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn get_catalog_item(&self, id: &str) -> Result<Option<CatalogObject>, CommerceError> {
        Ok(self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn update_catalog_item(&self, update: &CatalogItemUpdate) -> Result<i64, CommerceError> {
        let mut catalog = self.catalog.lock().unwrap();
        let Some(object) = catalog.iter_mut().find(|o| o.id == update.item_id) else {
            return Err(CommerceError::Api {
                status: 404,
                body: "object not found".to_string(),
            });
        };
        if update.version != object.version {
            return Err(CommerceError::VersionConflict {
                item_id: update.item_id.clone(),
            });
        }

        object.version += 1;
        if let Some(variation) = object
            .item_data
            .as_mut()
            .and_then(|d| d.variations.iter_mut().find(|v| v.id == update.variation_id))
        {
            variation.price_cents = Some(update.price_cents);
        }

        self.pushed_prices.lock().unwrap().push(update.clone());
        Ok(object.version)
    }

    async fn get_inventory_counts(
        &self,
        variation_ids: &[String],
        location_id: &str,
    ) -> Result<Vec<InventoryCount>, CommerceError> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| {
                variation_ids.contains(&c.catalog_object_id) && c.location_id == location_id
            })
            .cloned()
            .collect())
    }

    async fn set_inventory_quantity(&self, set: &InventorySet) -> Result<(), CommerceError> {
        let mut counts = self.counts.lock().unwrap();
        if let Some(count) = counts
            .iter_mut()
            .find(|c| c.catalog_object_id == set.variation_id && c.location_id == set.location_id)
        {
            count.quantity = Some(set.quantity.to_string());
        } else {
            counts.push(count_at(&set.variation_id, set.location_id.clone(), set.quantity));
        }
        self.pushed_inventory.lock().unwrap().push(set.clone());
        Ok(())
    }

    async fn upload_item_image(
        &self,
        item_id: &str,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, CommerceError> {
        Ok(format!("https://images.example.com/{item_id}/{filename}"))
    }
}

pub fn test_config() -> Config {
    let mut config = Config::with_overrides(":memory:", 0, TEST_SIGNATURE_KEY).unwrap();
    config.webhook_notification_url = TEST_NOTIFICATION_URL.to_string();
    config.commerce_base_url = "http://commerce.invalid".to_string();
    config.commerce_location_id = TEST_LOCATION.to_string();
    config
}

/// Fresh in-memory state with a mock commerce API
pub async fn test_state() -> (AppState, Arc<MockCommerce>) {
    let pool = db::connect_in_memory().await.unwrap();
    let commerce = Arc::new(MockCommerce::default());
    let state = AppState::with_parts(pool, commerce.clone(), &test_config());
    (state, commerce)
}

/// Catalog ITEM with a single variation
pub fn item(
    id: &str,
    name: &str,
    version: i64,
    variation_id: &str,
    price_cents: i64,
) -> CatalogObject {
    CatalogObject {
        id: id.to_string(),
        object_type: "ITEM".to_string(),
        version,
        item_data: Some(CatalogItemData {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            image_url: None,
            variations: vec![CatalogVariation {
                id: variation_id.to_string(),
                version,
                sku: Some(format!("SKU-{variation_id}")),
                price_cents: Some(price_cents),
            }],
        }),
    }
}

pub fn count(variation_id: &str, quantity: i64) -> InventoryCount {
    count_at(variation_id, TEST_LOCATION.to_string(), quantity)
}

fn count_at(variation_id: &str, location_id: String, quantity: i64) -> InventoryCount {
    InventoryCount {
        catalog_object_id: variation_id.to_string(),
        location_id,
        state: Some("IN_STOCK".to_string()),
        quantity: Some(quantity.to_string()),
    }
}

/// Insert an active product linked to an external item
pub async fn insert_linked_product(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    price_cents: i64,
    quantity: i64,
    external_item_id: &str,
    external_variation_id: &str,
    version: i64,
) {
    sqlx::query(
        "INSERT INTO products (id, artist_id, status, external_item_id, external_variation_id, \
         external_catalog_version, cache_name, cache_description, cache_price_cents, \
         cache_quantity, created_at) \
         VALUES (?, 'artist-1', 'active', ?, ?, ?, ?, '', ?, ?, ?)",
    )
    .bind(id)
    .bind(external_item_id)
    .bind(external_variation_id)
    .bind(version)
    .bind(name)
    .bind(price_cents)
    .bind(quantity)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
}

/// Insert a product with no external link
pub async fn insert_unlinked_product(pool: &SqlitePool, id: &str, name: &str, price_cents: i64) {
    sqlx::query(
        "INSERT INTO products (id, artist_id, status, cache_name, cache_description, \
         cache_price_cents, cache_quantity, created_at) \
         VALUES (?, 'artist-1', 'active', ?, '', ?, 0, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(price_cents)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
}
