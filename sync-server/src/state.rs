//! Application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::external::{CommerceApi, CommerceClient};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// External commerce API client
    pub commerce: Arc<dyn CommerceApi>,
    /// Webhook signature key
    pub webhook_signature_key: String,
    /// Notification URL included in the signed payload
    pub webhook_notification_url: String,
    /// Inventory location this deployment tracks
    pub location_id: String,
}

impl AppState {
    /// Initialize state: connect to DB, run migrations, build the commerce client
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_path).await?;
        let commerce = Arc::new(CommerceClient::new(
            config.commerce_base_url.clone(),
            config.commerce_access_token.clone(),
        )?);

        Ok(Self::with_parts(pool, commerce, config))
    }

    /// Assemble state from pre-built parts; tests inject a mock commerce client
    pub fn with_parts(pool: SqlitePool, commerce: Arc<dyn CommerceApi>, config: &Config) -> Self {
        Self {
            pool,
            commerce,
            webhook_signature_key: config.webhook_signature_key.clone(),
            webhook_notification_url: config.webhook_notification_url.clone(),
            location_id: config.commerce_location_id.clone(),
        }
    }
}
