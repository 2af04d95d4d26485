//! Conflict domain model and sync DTOs
//!
//! Types shared between the reconciliation engine and the admin API:
//! the conflict record with its immutable snapshots, the resolution
//! request/response shapes, and the webhook acknowledgement body.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Name recorded in the external snapshot when the linked item has
/// vanished from the external catalog
pub const DELETED_EXTERNAL_NAME: &str = "(deleted from external catalog)";

// ========== Conflict classification ==========

/// Kind of divergence detected between local and external state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Stock quantity differs between local cache and external counts
    QuantityMismatch,
    /// Price differs between local cache and external catalog
    PriceMismatch,
    /// Local product is linked but the external item no longer exists
    MissingExternal,
    /// External item exists but no local product tracks it
    MissingLocal,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuantityMismatch => "quantity_mismatch",
            Self::PriceMismatch => "price_mismatch",
            Self::MissingExternal => "missing_external",
            Self::MissingLocal => "missing_local",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quantity_mismatch" => Ok(Self::QuantityMismatch),
            "price_mismatch" => Ok(Self::PriceMismatch),
            "missing_external" => Ok(Self::MissingExternal),
            "missing_local" => Ok(Self::MissingLocal),
            other => Err(format!("unknown conflict type: {other}")),
        }
    }
}

/// Lifecycle state of a conflict record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Pending,
    Resolved,
}

impl ConflictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ConflictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown conflict status: {other}")),
        }
    }
}

/// Strategy chosen by an operator when resolving a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Push the local snapshot to the external system
    UseLocal,
    /// Pull the captured external snapshot into the local cache
    UseExternal,
    /// Fixed out-of-band; requires notes
    Manual,
    /// Acknowledged without action
    Ignored,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UseLocal => "use_local",
            Self::UseExternal => "use_external",
            Self::Manual => "manual",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "use_local" => Ok(Self::UseLocal),
            "use_external" => Ok(Self::UseExternal),
            "manual" => Ok(Self::Manual),
            "ignored" => Ok(Self::Ignored),
            other => Err(format!("unknown resolution: {other}")),
        }
    }
}

// ========== Conflict record ==========

/// What a conflict record points at: a local product, or an external
/// catalog item that has no local counterpart
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConflictSubject {
    Local(String),
    External(String),
}

impl ConflictSubject {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::External(_) => "external",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Local(id) | Self::External(id) => id,
        }
    }

    pub fn from_parts(kind: &str, id: String) -> Option<Self> {
        match kind {
            "local" => Some(Self::Local(id)),
            "external" => Some(Self::External(id)),
            _ => None,
        }
    }
}

/// Local side of a conflict, captured at detection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSnapshot {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

/// External side of a conflict, captured at detection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSnapshot {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

/// A detected divergence between local and external state.
///
/// Snapshots are immutable once written; resolution appends to the record
/// and never rewrites what was detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub id: String,
    pub subject: ConflictSubject,
    /// External system the conflict was detected against
    pub system: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub status: ConflictStatus,
    pub detected_at: i64,
    pub local_state: LocalSnapshot,
    pub external_state: ExternalSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ========== Admin DTOs ==========

/// Request body for a detection sweep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectRequest {
    /// External system to sweep; defaults to the only supported one
    #[serde(default)]
    pub system: Option<String>,
    /// Restrict the sweep to these product ids
    #[serde(default)]
    pub product_ids: Option<Vec<String>>,
}

/// Result of a detection sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectReport {
    /// New conflict records created by this sweep
    pub detected: u32,
    /// Divergences that already had a pending conflict
    pub skipped: u32,
    /// All currently pending conflicts
    pub conflicts: Vec<Conflict>,
}

/// Request body for resolving one conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub resolution: Resolution,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub resolved_by: Option<String>,
}

/// Pending/resolved totals with a per-type breakdown of pending conflicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub pending: i64,
    pub resolved: i64,
    pub pending_by_type: HashMap<String, i64>,
}

// ========== Webhook acknowledgement ==========

/// What the engine did with one external change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Created,
    Updated,
    Skipped,
    Rescanned,
}

/// Outcome of applying one external change
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub action: SyncAction,
    pub details: Option<String>,
}

impl SyncOutcome {
    pub fn created() -> Self {
        Self {
            action: SyncAction::Created,
            details: None,
        }
    }

    pub fn updated() -> Self {
        Self {
            action: SyncAction::Updated,
            details: None,
        }
    }

    pub fn skipped(details: impl Into<String>) -> Self {
        Self {
            action: SyncAction::Skipped,
            details: Some(details.into()),
        }
    }

    pub fn rescanned(details: impl Into<String>) -> Self {
        Self {
            action: SyncAction::Rescanned,
            details: Some(details.into()),
        }
    }
}

/// Tallies from a full-catalog rescan
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RescanReport {
    pub created: u32,
    pub updated: u32,
    pub failed: u32,
}

impl fmt::Display for RescanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} updated={} failed={}",
            self.created, self.updated, self.failed
        )
    }
}

/// Acknowledgement body returned for every authenticated webhook delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    pub event_id: String,
    pub action: SyncAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_string_roundtrip() {
        for ty in [
            ConflictType::QuantityMismatch,
            ConflictType::PriceMismatch,
            ConflictType::MissingExternal,
            ConflictType::MissingLocal,
        ] {
            assert_eq!(ty.as_str().parse::<ConflictType>(), Ok(ty));
        }
        for res in [
            Resolution::UseLocal,
            Resolution::UseExternal,
            Resolution::Manual,
            Resolution::Ignored,
        ] {
            assert_eq!(res.as_str().parse::<Resolution>(), Ok(res));
        }
        assert_eq!("pending".parse::<ConflictStatus>(), Ok(ConflictStatus::Pending));
        assert!("frozen".parse::<ConflictStatus>().is_err());
    }

    #[test]
    fn test_conflict_subject_parts() {
        let subject = ConflictSubject::Local("p-1".to_string());
        assert_eq!(subject.kind(), "local");
        assert_eq!(subject.id(), "p-1");
        assert_eq!(
            ConflictSubject::from_parts("local", "p-1".to_string()),
            Some(subject)
        );
        assert_eq!(
            ConflictSubject::from_parts("external", "ext-1".to_string()),
            Some(ConflictSubject::External("ext-1".to_string()))
        );
        assert_eq!(ConflictSubject::from_parts("remote", "x".to_string()), None);
    }

    #[test]
    fn test_conflict_subject_serde_tagged() {
        let subject = ConflictSubject::External("ext-9".to_string());
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, r#"{"kind":"external","id":"ext-9"}"#);

        let back: ConflictSubject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
    }

    #[test]
    fn test_resolve_request_deserialize() {
        let json = r#"{"resolution": "use_local", "notes": "operator checked shelf"}"#;
        let request: ResolveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resolution, Resolution::UseLocal);
        assert_eq!(request.notes.as_deref(), Some("operator checked shelf"));
        assert!(request.resolved_by.is_none());
    }

    #[test]
    fn test_webhook_ack_serialize() {
        let ack = WebhookAck {
            received: true,
            event_id: "evt-1".to_string(),
            action: SyncAction::Skipped,
            details: Some("unhandled event type".to_string()),
        };
        let json = serde_json::to_string(&ack).unwrap();
        assert!(json.contains("\"received\":true"));
        assert!(json.contains("\"action\":\"skipped\""));
    }
}
