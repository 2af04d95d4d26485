//! Shared types for the catalog sync service
//!
//! Common types used across the workspace: wire types for the external
//! commerce platform, the conflict domain model, the unified error system,
//! and utility functions.

pub mod error;
pub mod external;
pub mod sync;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
