//! Catalog & inventory reconciliation service
//!
//! Companion service that keeps the local product catalog consistent with
//! an external commerce platform:
//! - Authenticates and dispatches commerce webhook notifications
//! - Folds external catalog and inventory changes into the product store
//! - Detects divergences between the two systems and records them as
//!   conflicts for operator resolution

pub mod api;
pub mod config;
pub mod db;
pub mod external;
pub mod state;
pub mod sync;

pub use config::Config;
pub use state::AppState;
