//! Conflict resolution
//!
//! State machine over conflict records: `pending → resolved`, exactly
//! once. Side effects run against the snapshots captured at detection
//! time, never against re-read live state; an operator resolves what they
//! saw. When a side effect fails the conflict stays pending.

use shared::error::{AppError, ErrorCode};
use shared::external::{CatalogItemUpdate, InventorySet};
use shared::sync::{Conflict, ConflictStatus, ConflictSubject, ConflictType, Resolution, ResolveRequest};

use crate::db::conflicts;
use crate::db::products::{self, CacheUpdate, Product};
use crate::external::CommerceError;
use crate::state::AppState;

/// Identity recorded when the request names no operator
const DEFAULT_RESOLVED_BY: &str = "admin";

/// Resolve one conflict, applying the chosen strategy's side effects first
pub async fn resolve_conflict(
    state: &AppState,
    conflict_id: &str,
    request: &ResolveRequest,
) -> Result<Conflict, AppError> {
    let conflict = conflicts::find_by_id(&state.pool, conflict_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ConflictNotFound,
                format!("Conflict {conflict_id} not found"),
            )
        })?;

    if conflict.status != ConflictStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::ConflictAlreadyResolved,
            format!("Conflict {conflict_id} is already {}", conflict.status),
        ));
    }

    match request.resolution {
        Resolution::UseLocal => apply_use_local(state, &conflict).await?,
        Resolution::UseExternal => apply_use_external(state, &conflict).await?,
        Resolution::Manual => {
            if request.notes.as_deref().is_none_or(|n| n.trim().is_empty()) {
                return Err(AppError::with_message(
                    ErrorCode::ResolutionNotesRequired,
                    "Manual resolution requires notes describing the out-of-band fix",
                ));
            }
        }
        Resolution::Ignored => {}
    }

    let resolved_by = request
        .resolved_by
        .as_deref()
        .unwrap_or(DEFAULT_RESOLVED_BY);
    let rows = conflicts::resolve(
        &state.pool,
        conflict_id,
        request.resolution,
        resolved_by,
        request.notes.as_deref(),
    )
    .await
    .map_err(db_error)?;

    // rows_affected guards against a concurrent resolve between our read
    // and this write
    if rows == 0 {
        return Err(AppError::with_message(
            ErrorCode::ConflictAlreadyResolved,
            format!("Conflict {conflict_id} was resolved concurrently"),
        ));
    }

    tracing::info!(
        conflict_id,
        resolution = %request.resolution,
        resolved_by,
        "Conflict resolved"
    );

    conflicts::find_by_id(&state.pool, conflict_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::internal("Conflict disappeared after resolution"))
}

/// Push the local snapshot outward
async fn apply_use_local(state: &AppState, conflict: &Conflict) -> Result<(), AppError> {
    match conflict.conflict_type {
        ConflictType::QuantityMismatch => {
            let product = load_subject_product(state, conflict).await?;
            let variation_id = product.external_variation_id.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotLinked,
                    format!("Product {} has no external variation link", product.id),
                )
            })?;

            state
                .commerce
                .set_inventory_quantity(&InventorySet {
                    variation_id,
                    location_id: state.location_id.clone(),
                    quantity: conflict.local_state.quantity,
                })
                .await
                .map_err(commerce_error)?;
            Ok(())
        }
        ConflictType::PriceMismatch => {
            let product = load_subject_product(state, conflict).await?;
            let (Some(item_id), Some(variation_id)) = (
                product.external_item_id.clone(),
                product.external_variation_id.clone(),
            ) else {
                return Err(AppError::with_message(
                    ErrorCode::ProductNotLinked,
                    format!("Product {} has no external catalog link", product.id),
                ));
            };
            let version = product.external_catalog_version.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CatalogVersionStale,
                    format!("Product {} has no recorded version token", product.id),
                )
            })?;

            let new_version = state
                .commerce
                .update_catalog_item(&CatalogItemUpdate {
                    item_id,
                    variation_id,
                    version,
                    price_cents: conflict.local_state.price_cents,
                })
                .await
                .map_err(commerce_error)?;

            // External now matches local; record the fresh version token
            products::update_cache(&state.pool, &product.id, &CacheUpdate::default(), Some(new_version))
                .await
                .map_err(db_error)?;
            Ok(())
        }
        ConflictType::MissingExternal => Err(AppError::with_message(
            ErrorCode::ResolutionUnsupported,
            "External item was deleted; recreate it in the commerce catalog before resolving",
        )),
        ConflictType::MissingLocal => Err(AppError::with_message(
            ErrorCode::ResolutionUnsupported,
            "No local product exists to push; create one and link it first",
        )),
    }
}

/// Pull the captured external snapshot into the local cache
async fn apply_use_external(state: &AppState, conflict: &Conflict) -> Result<(), AppError> {
    if conflict.conflict_type == ConflictType::MissingLocal {
        return Err(AppError::with_message(
            ErrorCode::ResolutionUnsupported,
            "No local product exists to update; create one and link it first",
        ));
    }

    let product = load_subject_product(state, conflict).await?;
    let cache = match conflict.conflict_type {
        ConflictType::QuantityMismatch => CacheUpdate {
            quantity: Some(conflict.external_state.quantity),
            ..CacheUpdate::default()
        },
        ConflictType::PriceMismatch => CacheUpdate {
            price_cents: Some(conflict.external_state.price_cents),
            ..CacheUpdate::default()
        },
        // missing_external: accept the deletion snapshot into the cache
        _ => CacheUpdate {
            name: Some(conflict.external_state.name.clone()),
            price_cents: Some(conflict.external_state.price_cents),
            quantity: Some(conflict.external_state.quantity),
            ..CacheUpdate::default()
        },
    };

    products::update_cache(&state.pool, &product.id, &cache, None)
        .await
        .map_err(db_error)?;
    Ok(())
}

async fn load_subject_product(state: &AppState, conflict: &Conflict) -> Result<Product, AppError> {
    let ConflictSubject::Local(product_id) = &conflict.subject else {
        return Err(AppError::with_message(
            ErrorCode::ProductNotFound,
            "Conflict references an external-only item",
        ));
    };

    products::find_by_id(&state.pool, product_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {product_id} referenced by conflict no longer exists"),
            )
        })
}

fn commerce_error(err: CommerceError) -> AppError {
    match err {
        CommerceError::VersionConflict { item_id } => AppError::with_message(
            ErrorCode::CatalogVersionStale,
            format!("Catalog version is stale for item {item_id}; re-run detection"),
        ),
        other => {
            tracing::error!("Commerce API call failed during resolution: {other}");
            AppError::external_api(other.to_string())
        }
    }
}

fn db_error(err: sqlx::Error) -> AppError {
    tracing::error!("Conflict resolution database error: {err}");
    AppError::database(err.to_string())
}
