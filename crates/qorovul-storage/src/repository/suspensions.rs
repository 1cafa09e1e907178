//! Suspension history repository.

use chrono::{DateTime, Utc};
use qorovul_core::{OffenseLevel, SuspensionRecord};
use rusqlite::{params, Connection, Row};

use super::parse_datetime;
use crate::error::{Result, StorageError};
use crate::models::SuspensionEvent;

type SuspensionRow = (i64, i64, String, String, Option<String>, String);

fn suspension_from_row(row: &Row<'_>) -> rusqlite::Result<SuspensionRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode(
    (id, account_id, level, reason, blocked_until, created_at): SuspensionRow,
) -> Result<SuspensionEvent> {
    let level = OffenseLevel::parse(&level)
        .filter(OffenseLevel::is_violation)
        .ok_or_else(|| StorageError::Corrupt(format!("suspension {id} has level '{level}'")))?;

    Ok(SuspensionEvent {
        id,
        account_id,
        level,
        reason,
        blocked_until: blocked_until.as_deref().map(parse_datetime).transpose()?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Repository for the suspension audit trail.
pub struct SuspensionsRepo;

impl SuspensionsRepo {
    /// Record a block that was just written onto an account.
    pub fn insert(
        conn: &Connection,
        account_id: i64,
        record: &SuspensionRecord,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let level = record
            .level()
            .filter(|_| record.is_blocked())
            .ok_or_else(|| StorageError::Corrupt("cannot log a record without a block".into()))?;

        conn.execute(
            "INSERT INTO suspensions (account_id, level, reason, blocked_until, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account_id,
                level.as_str(),
                record.block_reason(),
                record.blocked_until().map(|t| t.to_rfc3339()),
                created_at.to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get an account's suspensions, newest first.
    pub fn get_for_account(
        conn: &Connection,
        account_id: i64,
        limit: i64,
    ) -> Result<Vec<SuspensionEvent>> {
        let mut stmt = conn.prepare(
            "SELECT id, account_id, level, reason, blocked_until, created_at FROM suspensions
             WHERE account_id = ?1 ORDER BY id DESC LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![account_id, limit], suspension_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(decode).collect()
    }
}
