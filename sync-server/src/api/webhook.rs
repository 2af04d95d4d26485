//! POST /webhooks/commerce — commerce platform webhook ingress
//!
//! The body is taken raw: signature verification runs over the exact
//! bytes the sender signed. Once a delivery is authenticated it is
//! acknowledged with 200 even when the event is unhandled or skipped;
//! the sender retries on 5xx, and a transient commerce outage must not
//! trigger a redelivery storm. Only store failures return 500.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use shared::external::webhook::{
    EVENT_CATALOG_VERSION_UPDATED, EVENT_INVENTORY_COUNT_UPDATED, WebhookEvent,
};
use shared::sync::{SyncOutcome, WebhookAck};

use crate::state::AppState;
use crate::sync::{SyncError, catalog, inventory, signature};

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature_value) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("Webhook delivery without signature header");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    if let Err(reason) = signature::verify_signature(
        &state.webhook_signature_key,
        &state.webhook_notification_url,
        &body,
        signature_value,
    ) {
        tracing::warn!(reason, "Webhook signature verification failed");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Webhook body is not a valid event: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    tracing::info!(
        event_type = %event.event_type,
        event_id = %event.event_id,
        "Received commerce webhook"
    );

    let result = match event.event_type.as_str() {
        EVENT_CATALOG_VERSION_UPDATED => handle_catalog_event(&state, &event).await,
        EVENT_INVENTORY_COUNT_UPDATED => handle_inventory_event(&state, &event).await,
        other => Ok(SyncOutcome::skipped(format!("unhandled event type {other}"))),
    };

    match result {
        Ok(outcome) => {
            let ack = WebhookAck {
                received: true,
                event_id: event.event_id,
                action: outcome.action,
                details: outcome.details,
            };
            (StatusCode::OK, Json(ack)).into_response()
        }
        // Commerce API failures ack as skipped: the notification is only a
        // hint, the next event or sweep reconverges
        Err(SyncError::Commerce(e)) => {
            tracing::warn!(
                event_id = %event.event_id,
                error = %e,
                "Commerce API unavailable while handling webhook, sync dropped"
            );
            let ack = WebhookAck {
                received: true,
                event_id: event.event_id,
                action: shared::sync::SyncAction::Skipped,
                details: Some(format!("commerce API unavailable: {e}")),
            };
            (StatusCode::OK, Json(ack)).into_response()
        }
        Err(SyncError::Db(e)) => {
            tracing::error!(
                event_id = %event.event_id,
                error = %e,
                "Store failure while handling webhook"
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn handle_catalog_event(
    state: &AppState,
    event: &WebhookEvent,
) -> Result<SyncOutcome, SyncError> {
    match event.data.id.as_deref() {
        Some(catalog_object_id) => catalog::apply_catalog_object_id(state, catalog_object_id).await,
        None => {
            let report = catalog::rescan_catalog(state).await?;
            Ok(SyncOutcome::rescanned(report.to_string()))
        }
    }
}

async fn handle_inventory_event(
    state: &AppState,
    event: &WebhookEvent,
) -> Result<SyncOutcome, SyncError> {
    let counts = event.inventory_counts();
    if counts.is_empty() {
        return Ok(SyncOutcome::skipped("event carries no inventory counts"));
    }

    let mut updated = 0u32;
    let mut skipped = 0u32;
    for payload in &counts {
        match inventory::apply_inventory_count(state, payload).await? {
            outcome if outcome.action == shared::sync::SyncAction::Updated => updated += 1,
            _ => skipped += 1,
        }
    }

    if updated == 0 {
        Ok(SyncOutcome::skipped(format!(
            "no tracked variations among {} counts",
            counts.len()
        )))
    } else {
        Ok(SyncOutcome {
            action: shared::sync::SyncAction::Updated,
            details: Some(format!("updated={updated} skipped={skipped}")),
        })
    }
}
