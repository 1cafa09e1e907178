//! Qorovul Storage - SQLite persistence layer.
//!
//! This crate stores accounts, chats and messages for Qorovul, and routes
//! account messages through the moderation gate before anything is written.
//! It handles:
//!
//! - Accounts with their suspension state
//! - Chats and their message history
//! - The suspension audit trail (levels and reasons only, never message text)
//! - Configuration key-value storage, including the word lists
//!
//! # Example
//!
//! ```no_run
//! use qorovul_core::{Language, SendGate};
//! use qorovul_storage::{Database, models::{ChatKind, NewAccount, NewChat}};
//!
//! let db = Database::in_memory().unwrap();
//! let owner = db.create_account(NewAccount {
//!     name: "Aziz".to_string(),
//!     language: Language::Uz,
//! }).unwrap();
//! let chat = db.create_chat(NewChat {
//!     name: "Oila".to_string(),
//!     kind: ChatKind::Group,
//!     owner_id: owner,
//! }).unwrap();
//!
//! let outcome = db.submit_message(&SendGate::default(), owner, chat, "salom").unwrap();
//! assert!(outcome.message_id.is_some());
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::{Database, WORD_LISTS_KEY};
pub use error::{Result, StorageError};
pub use models::{
    Chat, ChatKind, Config, Message, NewAccount, NewChat, NewMessage, SenderRole, SubmitOutcome,
    SuspensionEvent,
};
pub use pool::ConnectionPool;
pub use repository::{AccountsRepo, ChatsRepo, ConfigRepo, MessagesRepo, SuspensionsRepo};
