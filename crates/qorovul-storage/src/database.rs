//! High-level database interface.

use std::path::PathBuf;

use chrono::Utc;
use directories::ProjectDirs;
use qorovul_core::{Account, Clock, ContentClassifier, GateDecision, SendGate, WordLists};
use tracing::{info, warn};

use crate::error::{Result, StorageError};
use crate::models::{
    Chat, Config, Message, NewAccount, NewChat, NewMessage, SenderRole, SubmitOutcome,
    SuspensionEvent,
};
use crate::pool::ConnectionPool;
use crate::repository::{AccountsRepo, ChatsRepo, ConfigRepo, MessagesRepo, SuspensionsRepo};

/// Config key holding the word lists as JSON.
pub const WORD_LISTS_KEY: &str = "word_lists";

/// High-level database interface for Qorovul.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "qorovul", "qorovul")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("qorovul.db"))
    }

    // === Accounts ===

    /// Create a new account.
    pub fn create_account(&self, account: NewAccount) -> Result<i64> {
        let conn = self.pool.get()?;
        let id = AccountsRepo::insert(&conn, account, Utc::now())?;
        info!(account_id = id, "account created");
        Ok(id)
    }

    /// Get an account by ID.
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.pool.get()?;
        AccountsRepo::get_by_id(&conn, id)
    }

    /// Get all accounts.
    pub fn get_all_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.pool.get()?;
        AccountsRepo::get_all(&conn)
    }

    /// Remove any block from an account. Administrative action only.
    pub fn lift_suspension(&self, id: i64) -> Result<()> {
        let conn = self.pool.get()?;
        let mut account = AccountsRepo::get_by_id(&conn, id)?
            .ok_or_else(|| StorageError::NotFound(format!("Account with id {}", id)))?;

        account.lift_suspension();
        AccountsRepo::save_suspension(&conn, id, account.suspension())?;
        info!(account_id = id, "suspension lifted");
        Ok(())
    }

    /// Get an account's suspension history, newest first.
    pub fn get_suspension_history(&self, account_id: i64, limit: i64) -> Result<Vec<SuspensionEvent>> {
        let conn = self.pool.get()?;
        SuspensionsRepo::get_for_account(&conn, account_id, limit)
    }

    // === Chats ===

    /// Create a new chat.
    pub fn create_chat(&self, chat: NewChat) -> Result<i64> {
        let conn = self.pool.get()?;
        ChatsRepo::insert(&conn, chat, Utc::now())
    }

    /// Get a chat by ID.
    pub fn get_chat(&self, id: i64) -> Result<Option<Chat>> {
        let conn = self.pool.get()?;
        ChatsRepo::get_by_id(&conn, id)
    }

    /// Get the chats owned by an account.
    pub fn get_chats_for_owner(&self, owner_id: i64) -> Result<Vec<Chat>> {
        let conn = self.pool.get()?;
        ChatsRepo::get_by_owner(&conn, owner_id)
    }

    // === Messages ===

    /// Append a message without moderation.
    ///
    /// For assistant and system messages. Account messages go through
    /// [`Database::submit_message`].
    pub fn append_message(&self, message: NewMessage) -> Result<i64> {
        let conn = self.pool.get()?;
        MessagesRepo::insert(&conn, message, Utc::now())
    }

    /// Get the most recent messages of a chat, oldest first.
    pub fn get_messages(&self, chat_id: i64, limit: i64) -> Result<Vec<Message>> {
        let conn = self.pool.get()?;
        MessagesRepo::get_recent(&conn, chat_id, limit)
    }

    /// Get the latest message of a chat.
    pub fn get_last_message(&self, chat_id: i64) -> Result<Option<Message>> {
        let conn = self.pool.get()?;
        MessagesRepo::get_last(&conn, chat_id)
    }

    /// Send a message from an account through moderation.
    ///
    /// Loading the account, running the gate and writing either the message
    /// or the new block happen in one transaction. A rejected message is
    /// never written anywhere.
    pub fn submit_message<C: Clock>(
        &self,
        gate: &SendGate<C>,
        account_id: i64,
        chat_id: i64,
        text: &str,
    ) -> Result<SubmitOutcome> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;

        let mut account = AccountsRepo::get_by_id(&tx, account_id)?
            .ok_or_else(|| StorageError::NotFound(format!("Account with id {}", account_id)))?;
        if ChatsRepo::get_by_id(&tx, chat_id)?.is_none() {
            return Err(StorageError::NotFound(format!("Chat with id {}", chat_id)));
        }

        let now = gate.now();
        let decision = gate.submit_at(&mut account, text, now)?;
        let mut message_id = None;

        match &decision {
            GateDecision::Accepted => {
                let id = MessagesRepo::insert(
                    &tx,
                    NewMessage {
                        chat_id,
                        sender_id: Some(account_id),
                        sender_role: SenderRole::User,
                        text: text.to_string(),
                    },
                    now,
                )?;
                info!(account_id, chat_id, message_id = id, "message stored");
                message_id = Some(id);
            }
            GateDecision::Rejected { classification, .. } => {
                AccountsRepo::save_suspension(&tx, account_id, account.suspension())?;
                SuspensionsRepo::insert(&tx, account_id, account.suspension(), now)?;
                warn!(
                    account_id,
                    chat_id,
                    level = %classification.level,
                    "message discarded, account suspended"
                );
            }
            GateDecision::Ignored | GateDecision::Suspended { .. } => {}
        }

        tx.commit()?;

        Ok(SubmitOutcome {
            decision,
            message_id,
        })
    }

    // === Config ===

    /// Get a configuration value.
    pub fn get_config(&self, key: &str) -> Result<Option<Config>> {
        let conn = self.pool.get()?;
        ConfigRepo::get(&conn, key)
    }

    /// Set a configuration value.
    pub fn set_config(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.pool.get()?;
        ConfigRepo::set(&conn, key, value)
    }

    /// Get the stored word lists, if any were imported.
    pub fn get_word_lists(&self) -> Result<Option<WordLists>> {
        match self.get_config(WORD_LISTS_KEY)? {
            Some(config) => Ok(Some(WordLists::from_json_value(config.value)?)),
            None => Ok(None),
        }
    }

    /// Store word lists once they compile into a classifier.
    pub fn set_word_lists(&self, lists: &WordLists) -> Result<()> {
        ContentClassifier::with_word_lists(lists)?;
        self.set_config(WORD_LISTS_KEY, &serde_json::to_value(lists)?)?;
        info!("word lists updated");
        Ok(())
    }
}
