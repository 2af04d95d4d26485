//! Conflict admin API
//!
//! Internal endpoints for operators: run a detection sweep, list and
//! summarize conflicts, resolve one conflict.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::external::COMMERCE_SYSTEM;
use shared::sync::{
    Conflict, ConflictStatus, ConflictSummary, ConflictType, DetectRequest, DetectReport,
    ResolveRequest,
};

use crate::db::conflicts;
use crate::state::AppState;
use crate::sync::{detector, resolver};

/// POST /api/sync/conflicts/detect
pub async fn detect_conflicts(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> AppResult<Json<DetectReport>> {
    if let Some(system) = request.system.as_deref()
        && system != COMMERCE_SYSTEM
    {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedSystem,
            format!("External system {system} is not supported"),
        ));
    }

    let report = detector::detect_conflicts(&state, request.product_ids.as_deref()).await?;
    Ok(Json(report))
}

/// Query params for GET /api/sync/conflicts
#[derive(Debug, Default, Deserialize)]
pub struct ConflictFilter {
    pub status: Option<ConflictStatus>,
    #[serde(rename = "type")]
    pub conflict_type: Option<ConflictType>,
}

/// GET /api/sync/conflicts?status=pending&type=price_mismatch
pub async fn list_conflicts(
    State(state): State<AppState>,
    Query(filter): Query<ConflictFilter>,
) -> AppResult<Json<Vec<Conflict>>> {
    let conflicts = conflicts::find_filtered(&state.pool, filter.status, filter.conflict_type)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list conflicts: {e}");
            AppError::database(e.to_string())
        })?;

    Ok(Json(conflicts))
}

/// GET /api/sync/conflicts/summary
pub async fn conflict_summary(
    State(state): State<AppState>,
) -> AppResult<Json<ConflictSummary>> {
    let summary = conflicts::summary(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to summarize conflicts: {e}");
        AppError::database(e.to_string())
    })?;

    Ok(Json(summary))
}

/// POST /api/sync/conflicts/{id}/resolve
pub async fn resolve_conflict(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ResolveRequest>,
) -> AppResult<Json<Conflict>> {
    let conflict = resolver::resolve_conflict(&state, &id, &request).await?;
    Ok(Json(conflict))
}
