//! Message repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_datetime;
use crate::error::{Result, StorageError};
use crate::models::{Message, NewMessage, SenderRole};

type MessageRow = (i64, i64, Option<i64>, String, String, String);

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode((id, chat_id, sender_id, role, text, created_at): MessageRow) -> Result<Message> {
    let sender_role = SenderRole::parse(&role).ok_or_else(|| {
        StorageError::Corrupt(format!("message {id} has unknown sender role '{role}'"))
    })?;

    Ok(Message {
        id,
        chat_id,
        sender_id,
        sender_role,
        text,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Repository for message operations.
pub struct MessagesRepo;

impl MessagesRepo {
    /// Append a message to a chat.
    pub fn insert(conn: &Connection, message: NewMessage, created_at: DateTime<Utc>) -> Result<i64> {
        conn.execute(
            "INSERT INTO messages (chat_id, sender_id, sender_role, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.chat_id,
                message.sender_id,
                message.sender_role.as_str(),
                message.text,
                created_at.to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get the most recent `limit` messages of a chat, oldest first.
    pub fn get_recent(conn: &Connection, chat_id: i64, limit: i64) -> Result<Vec<Message>> {
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, sender_id, sender_role, text, created_at FROM (
                SELECT id, chat_id, sender_id, sender_role, text, created_at FROM messages
                WHERE chat_id = ?1 ORDER BY id DESC LIMIT ?2
             ) ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map(params![chat_id, limit], message_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(decode).collect()
    }

    /// Get the latest message of a chat.
    pub fn get_last(conn: &Connection, chat_id: i64) -> Result<Option<Message>> {
        conn.query_row(
            "SELECT id, chat_id, sender_id, sender_role, text, created_at FROM messages
             WHERE chat_id = ?1 ORDER BY id DESC LIMIT 1",
            [chat_id],
            message_from_row,
        )
        .optional()?
        .map(decode)
        .transpose()
    }
}
