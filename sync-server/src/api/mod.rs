//! HTTP API
//!
//! Two surfaces share one router: the webhook ingress the commerce
//! platform calls, and the internal admin API for conflict management.

pub mod conflicts;
pub mod health;
pub mod webhook;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/sync/conflicts", get(conflicts::list_conflicts))
        .route("/api/sync/conflicts/summary", get(conflicts::conflict_summary))
        .route("/api/sync/conflicts/detect", post(conflicts::detect_conflicts))
        .route(
            "/api/sync/conflicts/{id}/resolve",
            post(conflicts::resolve_conflict),
        );

    let ingress = Router::new().route("/webhooks/commerce", post(webhook::handle_webhook));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(admin)
        .merge(ingress)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
