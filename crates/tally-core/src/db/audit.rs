//! Access log
//!
//! The server appends one row per request. Rows are never updated, and
//! `soft_reset` leaves them in place.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;

/// Entries returned when a query names no limit
pub const DEFAULT_AUDIT_LIMIT: usize = 50;

/// Upper bound on a single read
pub const MAX_AUDIT_LIMIT: usize = 1000;

/// One recorded access
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    /// "api-key", "local-dev", or whoever the caller says it is
    pub actor: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}

/// Which entries to read back, newest first
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub limit: Option<usize>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

impl AuditQuery {
    pub fn latest(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// The requested limit, kept within `1..=MAX_AUDIT_LIMIT`
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .clamp(1, MAX_AUDIT_LIMIT)
    }
}

/// Raw audit columns, before the timestamp is parsed
struct AuditRow {
    id: i64,
    recorded_at: String,
    actor: String,
    action: String,
    entity_type: Option<String>,
    entity_id: Option<i64>,
    details: Option<String>,
}

impl AuditRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recorded_at: row.get(1)?,
            actor: row.get(2)?,
            action: row.get(3)?,
            entity_type: row.get(4)?,
            entity_id: row.get(5)?,
            details: row.get(6)?,
        })
    }

    fn into_entry(self) -> Result<AuditEntry> {
        Ok(AuditEntry {
            id: self.id,
            recorded_at: parse_datetime(&self.recorded_at)?,
            actor: self.actor,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            details: self.details,
        })
    }
}

impl Database {
    /// Append an access record stamped with the current time
    pub fn log_audit(
        &self,
        actor: &str,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        details: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_log (recorded_at, actor, action, entity_type, entity_id, details)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                format_datetime(&Utc::now()),
                actor,
                action,
                entity_type,
                entity_id,
                details
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Recent access records matching the query
    pub fn recent_audit(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, recorded_at, actor, action, entity_type, entity_id, details
             FROM audit_log
             WHERE (?1 IS NULL OR action = ?1)
               AND (?2 IS NULL OR entity_type = ?2)
             ORDER BY recorded_at DESC, id DESC
             LIMIT ?3",
        )?;

        let rows = stmt
            .query_map(
                params![
                    query.action.as_deref(),
                    query.entity_type.as_deref(),
                    query.effective_limit() as i64
                ],
                AuditRow::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(AuditRow::into_entry).collect()
    }
}
