//! Chat repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_datetime;
use crate::error::{Result, StorageError};
use crate::models::{Chat, ChatKind, NewChat};

type ChatRow = (i64, String, String, i64, String);

fn chat_from_row(row: &Row<'_>) -> rusqlite::Result<ChatRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode((id, name, kind, owner_id, created_at): ChatRow) -> Result<Chat> {
    let kind = ChatKind::parse(&kind)
        .ok_or_else(|| StorageError::Corrupt(format!("chat {id} has unknown kind '{kind}'")))?;

    Ok(Chat {
        id,
        name,
        kind,
        owner_id,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Repository for chat operations.
pub struct ChatsRepo;

impl ChatsRepo {
    /// Insert a new chat.
    pub fn insert(conn: &Connection, chat: NewChat, created_at: DateTime<Utc>) -> Result<i64> {
        conn.execute(
            "INSERT INTO chats (name, kind, owner_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                chat.name,
                chat.kind.as_str(),
                chat.owner_id,
                created_at.to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a chat by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Chat>> {
        conn.query_row(
            "SELECT id, name, kind, owner_id, created_at FROM chats WHERE id = ?1",
            [id],
            chat_from_row,
        )
        .optional()?
        .map(decode)
        .transpose()
    }

    /// Get all chats owned by an account.
    pub fn get_by_owner(conn: &Connection, owner_id: i64) -> Result<Vec<Chat>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, kind, owner_id, created_at FROM chats
             WHERE owner_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([owner_id], chat_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAccount;
    use crate::repository::AccountsRepo;
    use crate::schema::run_migrations;
    use qorovul_core::Language;

    fn setup_db() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let owner = AccountsRepo::insert(
            &conn,
            NewAccount {
                name: "Owner".to_string(),
                language: Language::Uz,
            },
            Utc::now(),
        )
        .unwrap();
        (conn, owner)
    }

    fn new_chat(name: &str, kind: ChatKind, owner_id: i64) -> NewChat {
        NewChat {
            name: name.to_string(),
            kind,
            owner_id,
        }
    }

    #[test]
    fn test_insert_and_get_chat() {
        let (conn, owner) = setup_db();
        let id = ChatsRepo::insert(&conn, new_chat("Oila", ChatKind::Group, owner), Utc::now())
            .unwrap();

        let chat = ChatsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(chat.name, "Oila");
        assert_eq!(chat.kind, ChatKind::Group);
        assert_eq!(chat.owner_id, owner);
    }

    #[test]
    fn test_get_by_owner() {
        let (conn, owner) = setup_db();
        ChatsRepo::insert(&conn, new_chat("A", ChatKind::Private, owner), Utc::now()).unwrap();
        ChatsRepo::insert(&conn, new_chat("B", ChatKind::Channel, owner), Utc::now()).unwrap();

        let chats = ChatsRepo::get_by_owner(&conn, owner).unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[1].kind, ChatKind::Channel);
        assert!(ChatsRepo::get_by_owner(&conn, owner + 1).unwrap().is_empty());
    }

    #[test]
    fn test_owner_must_exist() {
        let (conn, owner) = setup_db();
        let result =
            ChatsRepo::insert(&conn, new_chat("X", ChatKind::Group, owner + 100), Utc::now());
        assert!(matches!(result, Err(StorageError::Database(_))));
    }
}
