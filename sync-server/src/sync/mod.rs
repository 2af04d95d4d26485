//! Reconciliation engine
//!
//! Pull-based sync against the external commerce platform: webhook events
//! are hints, each handler re-reads current external state and folds it
//! into the product store. The detector and resolver manage the conflict
//! lifecycle.

pub mod catalog;
pub mod detector;
pub mod inventory;
pub mod resolver;
pub mod signature;

use shared::error::AppError;
use thiserror::Error;

use crate::external::CommerceError;

/// Errors from the reconcilers, split by origin so callers can decide
/// what is retryable
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("commerce API error: {0}")]
    Commerce(#[from] CommerceError),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Commerce(e) => AppError::external_api(e.to_string()),
            SyncError::Db(e) => {
                tracing::error!("Sync database error: {e}");
                AppError::database(e.to_string())
            }
        }
    }
}
