//! Catalog reconciliation
//!
//! Folds external catalog state into the product store. Handlers re-read
//! external truth on every apply, so replayed or out-of-order
//! notifications converge on the same final state.

use shared::external::CatalogObject;
use shared::sync::{RescanReport, SyncAction, SyncOutcome};

use super::SyncError;
use crate::db::products::{self, CacheUpdate, DraftProduct};
use crate::state::AppState;

/// Fetch one catalog object by id and apply it
pub async fn apply_catalog_object_id(
    state: &AppState,
    catalog_object_id: &str,
) -> Result<SyncOutcome, SyncError> {
    let Some(object) = state.commerce.get_catalog_item(catalog_object_id).await? else {
        return Ok(SyncOutcome::skipped(format!(
            "catalog object {catalog_object_id} not found in external catalog"
        )));
    };

    apply_catalog_object(state, &object).await
}

/// Apply one already-fetched catalog object.
///
/// Tracked items get a cache overwrite and a version bump; unseen items
/// become draft products. Owner and status are never touched.
pub async fn apply_catalog_object(
    state: &AppState,
    object: &CatalogObject,
) -> Result<SyncOutcome, SyncError> {
    if !object.is_item() {
        return Ok(SyncOutcome::skipped(format!(
            "object type {} is not tracked",
            object.object_type
        )));
    }

    match products::find_by_external_item_id(&state.pool, &object.id).await? {
        Some(product) => {
            let cache = cache_from_object(object);
            products::update_cache(&state.pool, &product.id, &cache, Some(object.version)).await?;
            tracing::debug!(
                product_id = %product.id,
                external_item_id = %object.id,
                version = object.version,
                "Updated product cache from external catalog"
            );
            Ok(SyncOutcome::updated())
        }
        None => {
            let Some(variation) = object.primary_variation() else {
                return Ok(SyncOutcome::skipped(format!(
                    "item {} has no variations",
                    object.id
                )));
            };

            let item_data = object.item_data.as_ref();
            let draft = DraftProduct {
                external_item_id: object.id.clone(),
                external_variation_id: variation.id.clone(),
                external_catalog_version: object.version,
                name: object.name().to_string(),
                description: item_data
                    .and_then(|d| d.description.clone())
                    .unwrap_or_default(),
                price_cents: variation.price_cents.unwrap_or(0),
                sku: variation.sku.clone(),
                image_url: item_data.and_then(|d| d.image_url.clone()),
            };

            let product = products::create_draft(&state.pool, draft).await?;
            tracing::info!(
                product_id = %product.id,
                external_item_id = %object.id,
                "Created draft product from external catalog item"
            );
            Ok(SyncOutcome::created())
        }
    }
}

/// Full-catalog rescan.
///
/// The catalog-changed notification names no object, so listing the whole
/// catalog is the only way to discover what moved. Per-item failures are
/// tallied and logged, never abort the scan.
pub async fn rescan_catalog(state: &AppState) -> Result<RescanReport, SyncError> {
    let objects = state.commerce.list_catalog_items().await?;
    let mut report = RescanReport::default();

    for object in &objects {
        match apply_catalog_object(state, object).await {
            Ok(outcome) => match outcome.action {
                SyncAction::Created => report.created += 1,
                SyncAction::Updated => report.updated += 1,
                _ => {}
            },
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    external_item_id = %object.id,
                    error = %e,
                    "Failed to reconcile catalog item, continuing"
                );
            }
        }
    }

    tracing::info!(
        created = report.created,
        updated = report.updated,
        failed = report.failed,
        total = objects.len(),
        "Catalog rescan complete"
    );

    Ok(report)
}

fn cache_from_object(object: &CatalogObject) -> CacheUpdate {
    let item_data = object.item_data.as_ref();
    let variation = object.primary_variation();

    CacheUpdate {
        name: Some(object.name().to_string()),
        description: Some(
            item_data
                .and_then(|d| d.description.clone())
                .unwrap_or_default(),
        ),
        price_cents: Some(variation.and_then(|v| v.price_cents).unwrap_or(0)),
        quantity: None,
        sku: variation.and_then(|v| v.sku.clone()),
        image_url: item_data.and_then(|d| d.image_url.clone()),
    }
}
