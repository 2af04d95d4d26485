//! Product store
//!
//! Products are the local system of record. Each row carries the link to
//! the external catalog (item id, variation id, version token) and a
//! cached snapshot of the external system's view, refreshed by the
//! reconcilers.

use shared::util::now_millis;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Local product row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    /// Owner; intentionally unset for drafts created from external items
    pub artist_id: Option<String>,
    /// draft | active
    pub status: String,
    pub external_item_id: Option<String>,
    pub external_variation_id: Option<String>,
    /// Last observed external version token
    pub external_catalog_version: Option<i64>,
    pub cache_name: String,
    pub cache_description: String,
    pub cache_price_cents: i64,
    pub cache_quantity: i64,
    pub cache_sku: Option<String>,
    pub cache_image_url: Option<String>,
    pub synced_at: Option<i64>,
    pub created_at: i64,
}

impl Product {
    /// Linked products have both external ids set
    pub fn is_linked(&self) -> bool {
        self.external_item_id.is_some() && self.external_variation_id.is_some()
    }
}

/// Cached fields mirrored from the external catalog
#[derive(Debug, Clone, Default)]
pub struct CacheUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
}

/// Input for creating a draft product from an unrecognized external item
#[derive(Debug, Clone)]
pub struct DraftProduct {
    pub external_item_id: String,
    pub external_variation_id: String,
    pub external_catalog_version: i64,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub sku: Option<String>,
    pub image_url: Option<String>,
}

const SELECT: &str = "SELECT id, artist_id, status, external_item_id, external_variation_id, \
     external_catalog_version, cache_name, cache_description, cache_price_cents, \
     cache_quantity, cache_sku, cache_image_url, synced_at, created_at FROM products";

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{SELECT} ORDER BY created_at"))
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_external_item_id(
    pool: &SqlitePool,
    external_item_id: &str,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE external_item_id = ?"))
        .bind(external_item_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_external_variation_id(
    pool: &SqlitePool,
    external_variation_id: &str,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE external_variation_id = ?"))
        .bind(external_variation_id)
        .fetch_optional(pool)
        .await
}

/// Create a draft product linked to an external item.
///
/// Drafts have no owner and stay out of the storefront until an operator
/// promotes them.
pub async fn create_draft(pool: &SqlitePool, draft: DraftProduct) -> Result<Product, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO products (id, artist_id, status, external_item_id, external_variation_id, \
         external_catalog_version, cache_name, cache_description, cache_price_cents, \
         cache_quantity, cache_sku, cache_image_url, synced_at, created_at) \
         VALUES (?, NULL, 'draft', ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&draft.external_item_id)
    .bind(&draft.external_variation_id)
    .bind(draft.external_catalog_version)
    .bind(&draft.name)
    .bind(&draft.description)
    .bind(draft.price_cents)
    .bind(&draft.sku)
    .bind(&draft.image_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Product {
        id,
        artist_id: None,
        status: "draft".to_string(),
        external_item_id: Some(draft.external_item_id),
        external_variation_id: Some(draft.external_variation_id),
        external_catalog_version: Some(draft.external_catalog_version),
        cache_name: draft.name,
        cache_description: draft.description,
        cache_price_cents: draft.price_cents,
        cache_quantity: 0,
        cache_sku: draft.sku,
        cache_image_url: draft.image_url,
        synced_at: Some(now),
        created_at: now,
    })
}

/// Overwrite cached external fields on one product.
///
/// Touches only the cache columns, `synced_at`, and optionally the version
/// token; owner and status are never written here.
pub async fn update_cache(
    pool: &SqlitePool,
    id: &str,
    cache: &CacheUpdate,
    new_version: Option<i64>,
) -> Result<(), sqlx::Error> {
    let mut sets: Vec<&str> = Vec::new();
    if cache.name.is_some() {
        sets.push("cache_name = ?");
    }
    if cache.description.is_some() {
        sets.push("cache_description = ?");
    }
    if cache.price_cents.is_some() {
        sets.push("cache_price_cents = ?");
    }
    if cache.quantity.is_some() {
        sets.push("cache_quantity = ?");
    }
    if cache.sku.is_some() {
        sets.push("cache_sku = ?");
    }
    if cache.image_url.is_some() {
        sets.push("cache_image_url = ?");
    }
    if new_version.is_some() {
        sets.push("external_catalog_version = ?");
    }
    sets.push("synced_at = ?");

    let sql = format!("UPDATE products SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);
    if let Some(v) = &cache.name {
        query = query.bind(v);
    }
    if let Some(v) = &cache.description {
        query = query.bind(v);
    }
    if let Some(v) = cache.price_cents {
        query = query.bind(v);
    }
    if let Some(v) = cache.quantity {
        query = query.bind(v);
    }
    if let Some(v) = &cache.sku {
        query = query.bind(v);
    }
    if let Some(v) = &cache.image_url {
        query = query.bind(v);
    }
    if let Some(v) = new_version {
        query = query.bind(v);
    }
    query.bind(now_millis()).bind(id).execute(pool).await?;

    Ok(())
}

/// Overwrite the cached stock quantity for one product
pub async fn update_quantity(pool: &SqlitePool, id: &str, quantity: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE products SET cache_quantity = ?, synced_at = ? WHERE id = ?")
        .bind(quantity)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
