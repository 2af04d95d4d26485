//! Conflict detection sweep
//!
//! Point-in-time comparison of linked products against external truth.
//! One catalog listing and one batched inventory call serve the whole
//! sweep; per-item fetches would be O(n) round trips against a
//! rate-limited API.

use std::collections::{HashMap, HashSet};

use shared::external::{COMMERCE_SYSTEM, CatalogObject};
use shared::sync::{
    ConflictSubject, ConflictType, DELETED_EXTERNAL_NAME, DetectReport, ExternalSnapshot,
    LocalSnapshot,
};

use super::SyncError;
use crate::db::conflicts::{self, NewConflict};
use crate::db::products::{self, Product};
use crate::state::AppState;

/// Run one detection sweep. `product_ids` restricts which local products
/// are compared; `missing_local` detection only runs on full sweeps.
pub async fn detect_conflicts(
    state: &AppState,
    product_ids: Option<&[String]>,
) -> Result<DetectReport, SyncError> {
    let all_products = products::find_all(&state.pool).await?;

    // External items tracked by any local product, filtered or not
    let tracked: HashSet<&str> = all_products
        .iter()
        .filter_map(|p| p.external_item_id.as_deref())
        .collect();

    let scoped: Vec<&Product> = all_products
        .iter()
        .filter(|p| product_ids.is_none_or(|ids| ids.contains(&p.id)))
        .filter(|p| p.is_linked())
        .collect();

    let catalog = state.commerce.list_catalog_items().await?;
    let catalog_by_id: HashMap<&str, &CatalogObject> =
        catalog.iter().map(|o| (o.id.as_str(), o)).collect();

    let untracked: Vec<&CatalogObject> = if product_ids.is_none() {
        catalog
            .iter()
            .filter(|o| o.is_item() && !tracked.contains(o.id.as_str()))
            .collect()
    } else {
        Vec::new()
    };

    // One batched count call covers linked products and untracked items
    let mut variation_ids: Vec<String> = scoped
        .iter()
        .filter_map(|p| p.external_variation_id.clone())
        .collect();
    variation_ids.extend(
        untracked
            .iter()
            .filter_map(|o| o.primary_variation().map(|v| v.id.clone())),
    );

    let counts = if variation_ids.is_empty() {
        Vec::new()
    } else {
        state
            .commerce
            .get_inventory_counts(&variation_ids, &state.location_id)
            .await?
    };
    let counts_by_variation: HashMap<&str, i64> = counts
        .iter()
        .map(|c| (c.catalog_object_id.as_str(), c.quantity_or_zero()))
        .collect();

    let mut candidates: Vec<NewConflict> = Vec::new();

    for product in &scoped {
        let Some(item_id) = product.external_item_id.as_deref() else {
            continue;
        };
        let local_state = LocalSnapshot {
            name: product.cache_name.clone(),
            price_cents: product.cache_price_cents,
            quantity: product.cache_quantity,
        };

        match catalog_by_id.get(item_id) {
            None => {
                candidates.push(NewConflict {
                    subject: ConflictSubject::Local(product.id.clone()),
                    system: COMMERCE_SYSTEM.to_string(),
                    conflict_type: ConflictType::MissingExternal,
                    local_state,
                    external_state: ExternalSnapshot {
                        name: DELETED_EXTERNAL_NAME.to_string(),
                        price_cents: 0,
                        quantity: 0,
                    },
                });
            }
            Some(object) => {
                let external_quantity = product
                    .external_variation_id
                    .as_deref()
                    .and_then(|v| counts_by_variation.get(v).copied())
                    .unwrap_or(0);
                let external_price = object
                    .primary_variation()
                    .and_then(|v| v.price_cents)
                    .unwrap_or(0);
                let external_state = ExternalSnapshot {
                    name: object.name().to_string(),
                    price_cents: external_price,
                    quantity: external_quantity,
                };

                if product.cache_quantity != external_quantity {
                    candidates.push(NewConflict {
                        subject: ConflictSubject::Local(product.id.clone()),
                        system: COMMERCE_SYSTEM.to_string(),
                        conflict_type: ConflictType::QuantityMismatch,
                        local_state: local_state.clone(),
                        external_state: external_state.clone(),
                    });
                }
                if product.cache_price_cents != external_price {
                    candidates.push(NewConflict {
                        subject: ConflictSubject::Local(product.id.clone()),
                        system: COMMERCE_SYSTEM.to_string(),
                        conflict_type: ConflictType::PriceMismatch,
                        local_state,
                        external_state,
                    });
                }
            }
        }
    }

    for object in &untracked {
        let quantity = object
            .primary_variation()
            .and_then(|v| counts_by_variation.get(v.id.as_str()).copied())
            .unwrap_or(0);
        candidates.push(NewConflict {
            subject: ConflictSubject::External(object.id.clone()),
            system: COMMERCE_SYSTEM.to_string(),
            conflict_type: ConflictType::MissingLocal,
            local_state: LocalSnapshot {
                name: String::new(),
                price_cents: 0,
                quantity: 0,
            },
            external_state: ExternalSnapshot {
                name: object.name().to_string(),
                price_cents: object
                    .primary_variation()
                    .and_then(|v| v.price_cents)
                    .unwrap_or(0),
                quantity,
            },
        });
    }

    let mut detected = 0u32;
    let mut skipped = 0u32;

    for candidate in candidates {
        let existing = conflicts::find_existing_pending(
            &state.pool,
            &candidate.subject,
            candidate.conflict_type,
            &candidate.system,
        )
        .await?;

        if existing.is_some() {
            skipped += 1;
            continue;
        }

        let conflict = conflicts::create(&state.pool, candidate).await?;
        tracing::info!(
            conflict_id = %conflict.id,
            conflict_type = %conflict.conflict_type,
            subject_kind = conflict.subject.kind(),
            subject_id = conflict.subject.id(),
            "Recorded sync conflict"
        );
        detected += 1;
    }

    let pending = conflicts::find_pending(&state.pool).await?;

    tracing::info!(detected, skipped, pending = pending.len(), "Detection sweep complete");

    Ok(DetectReport {
        detected,
        skipped,
        conflicts: pending,
    })
}
