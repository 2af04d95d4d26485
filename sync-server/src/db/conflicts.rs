//! Conflict store
//!
//! Conflict records are append-only: created `pending`, moved to
//! `resolved` exactly once, never mutated afterwards. A recurring
//! divergence gets a fresh record, preserving history.

use shared::sync::{
    Conflict, ConflictStatus, ConflictSubject, ConflictSummary, ConflictType, ExternalSnapshot,
    LocalSnapshot, Resolution,
};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Input for recording a newly detected conflict
#[derive(Debug, Clone)]
pub struct NewConflict {
    pub subject: ConflictSubject,
    pub system: String,
    pub conflict_type: ConflictType,
    pub local_state: LocalSnapshot,
    pub external_state: ExternalSnapshot,
}

#[derive(Debug, sqlx::FromRow)]
struct ConflictRow {
    id: String,
    subject_kind: String,
    subject_id: String,
    system: String,
    conflict_type: String,
    status: String,
    detected_at: i64,
    local_name: String,
    local_price_cents: i64,
    local_quantity: i64,
    external_name: String,
    external_price_cents: i64,
    external_quantity: i64,
    resolution: Option<String>,
    resolved_by: Option<String>,
    resolved_at: Option<i64>,
    notes: Option<String>,
}

impl ConflictRow {
    fn into_conflict(self) -> Result<Conflict, sqlx::Error> {
        let subject = ConflictSubject::from_parts(&self.subject_kind, self.subject_id)
            .ok_or_else(|| decode_err(format!("bad subject kind: {}", self.subject_kind)))?;
        let conflict_type = self.conflict_type.parse().map_err(decode_err)?;
        let status = self.status.parse().map_err(decode_err)?;
        let resolution = self
            .resolution
            .map(|r| r.parse::<Resolution>().map_err(decode_err))
            .transpose()?;

        Ok(Conflict {
            id: self.id,
            subject,
            system: self.system,
            conflict_type,
            status,
            detected_at: self.detected_at,
            local_state: LocalSnapshot {
                name: self.local_name,
                price_cents: self.local_price_cents,
                quantity: self.local_quantity,
            },
            external_state: ExternalSnapshot {
                name: self.external_name,
                price_cents: self.external_price_cents,
                quantity: self.external_quantity,
            },
            resolution,
            resolved_by: self.resolved_by,
            resolved_at: self.resolved_at,
            notes: self.notes,
        })
    }
}

fn decode_err(msg: String) -> sqlx::Error {
    sqlx::Error::Decode(msg.into())
}

const SELECT: &str = "SELECT id, subject_kind, subject_id, system, conflict_type, status, \
     detected_at, local_name, local_price_cents, local_quantity, external_name, \
     external_price_cents, external_quantity, resolution, resolved_by, resolved_at, notes \
     FROM sync_conflicts";

pub async fn create(pool: &SqlitePool, input: NewConflict) -> Result<Conflict, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO sync_conflicts (id, subject_kind, subject_id, system, conflict_type, \
         status, detected_at, local_name, local_price_cents, local_quantity, external_name, \
         external_price_cents, external_quantity) \
         VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(input.subject.kind())
    .bind(input.subject.id())
    .bind(&input.system)
    .bind(input.conflict_type.as_str())
    .bind(now)
    .bind(&input.local_state.name)
    .bind(input.local_state.price_cents)
    .bind(input.local_state.quantity)
    .bind(&input.external_state.name)
    .bind(input.external_state.price_cents)
    .bind(input.external_state.quantity)
    .execute(pool)
    .await?;

    Ok(Conflict {
        id,
        subject: input.subject,
        system: input.system,
        conflict_type: input.conflict_type,
        status: ConflictStatus::Pending,
        detected_at: now,
        local_state: input.local_state,
        external_state: input.external_state,
        resolution: None,
        resolved_by: None,
        resolved_at: None,
        notes: None,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Conflict>, sqlx::Error> {
    sqlx::query_as::<_, ConflictRow>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(ConflictRow::into_conflict)
        .transpose()
}

pub async fn find_pending(pool: &SqlitePool) -> Result<Vec<Conflict>, sqlx::Error> {
    sqlx::query_as::<_, ConflictRow>(&format!(
        "{SELECT} WHERE status = 'pending' ORDER BY detected_at"
    ))
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(ConflictRow::into_conflict)
    .collect()
}

/// Pending conflict for the same (subject, type, system), if one exists.
///
/// This read backs the detector's uniqueness check; there is no DB
/// constraint, so concurrent sweeps could double-insert.
pub async fn find_existing_pending(
    pool: &SqlitePool,
    subject: &ConflictSubject,
    conflict_type: ConflictType,
    system: &str,
) -> Result<Option<Conflict>, sqlx::Error> {
    sqlx::query_as::<_, ConflictRow>(&format!(
        "{SELECT} WHERE subject_kind = ? AND subject_id = ? AND conflict_type = ? \
         AND system = ? AND status = 'pending'"
    ))
    .bind(subject.kind())
    .bind(subject.id())
    .bind(conflict_type.as_str())
    .bind(system)
    .fetch_optional(pool)
    .await?
    .map(ConflictRow::into_conflict)
    .transpose()
}

pub async fn find_filtered(
    pool: &SqlitePool,
    status: Option<ConflictStatus>,
    conflict_type: Option<ConflictType>,
) -> Result<Vec<Conflict>, sqlx::Error> {
    let mut conditions: Vec<&str> = Vec::new();
    if status.is_some() {
        conditions.push("status = ?");
    }
    if conflict_type.is_some() {
        conditions.push("conflict_type = ?");
    }
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("{SELECT}{where_clause} ORDER BY detected_at DESC");
    let mut query = sqlx::query_as::<_, ConflictRow>(&sql);
    if let Some(s) = status {
        query = query.bind(s.as_str());
    }
    if let Some(t) = conflict_type {
        query = query.bind(t.as_str());
    }

    query
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(ConflictRow::into_conflict)
        .collect()
}

/// Mark a pending conflict resolved. Returns the number of rows updated;
/// 0 means the conflict was not pending (or does not exist).
pub async fn resolve(
    pool: &SqlitePool,
    id: &str,
    resolution: Resolution,
    resolved_by: &str,
    notes: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE sync_conflicts SET status = 'resolved', resolution = ?, resolved_by = ?, \
         resolved_at = ?, notes = ? WHERE id = ? AND status = 'pending'",
    )
    .bind(resolution.as_str())
    .bind(resolved_by)
    .bind(now_millis())
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Pending/resolved totals plus a per-type breakdown of pending conflicts
pub async fn summary(pool: &SqlitePool) -> Result<ConflictSummary, sqlx::Error> {
    let (pending, resolved): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(CASE WHEN status = 'pending' THEN 1 END), \
                COUNT(CASE WHEN status = 'resolved' THEN 1 END) FROM sync_conflicts",
    )
    .fetch_one(pool)
    .await?;

    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT conflict_type, COUNT(*) FROM sync_conflicts \
         WHERE status = 'pending' GROUP BY conflict_type",
    )
    .fetch_all(pool)
    .await?;

    let pending_by_type: HashMap<String, i64> = rows.into_iter().collect();

    Ok(ConflictSummary {
        pending,
        resolved,
        pending_by_type,
    })
}
