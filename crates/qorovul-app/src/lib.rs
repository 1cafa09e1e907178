//! Qorovul - command-line front end for message moderation.
//!
//! This crate wires the storage layer and the moderation gate together
//! behind the `qorovul` binary:
//!
//! - Argument parsing ([`cli`])
//! - Word list resolution and command execution ([`commands`])
//!
//! # Usage
//!
//! ```no_run
//! use qorovul_app::{cli::Command, App};
//! use qorovul_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//! let app = App::open(db, None).unwrap();
//!
//! let mut out = Vec::new();
//! app.run(Command::Check { text: "salom".to_string() }, &mut out).unwrap();
//! ```

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{load_word_lists, App, WordListSource};
