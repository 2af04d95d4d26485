//! Inventory reconciliation
//!
//! Overwrites the cached stock quantity from external counts. Counts for
//! variations no local product tracks are skipped, not errors: the
//! external catalog legitimately holds items sold outside this system.

use shared::external::InventoryCountPayload;
use shared::external::inventory::parse_quantity;
use shared::sync::SyncOutcome;

use super::SyncError;
use crate::db::products;
use crate::state::AppState;

/// Apply one inventory count from a webhook payload
pub async fn apply_inventory_count(
    state: &AppState,
    payload: &InventoryCountPayload,
) -> Result<SyncOutcome, SyncError> {
    let Some(product) =
        products::find_by_external_variation_id(&state.pool, &payload.catalog_object_id).await?
    else {
        return Ok(SyncOutcome::skipped(format!(
            "no product tracks variation {}",
            payload.catalog_object_id
        )));
    };

    let quantity = parse_quantity(payload.quantity.as_deref());
    products::update_quantity(&state.pool, &product.id, quantity).await?;

    tracing::debug!(
        product_id = %product.id,
        variation_id = %payload.catalog_object_id,
        quantity,
        "Updated cached quantity from external count"
    );

    Ok(SyncOutcome::updated())
}
