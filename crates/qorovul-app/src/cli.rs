//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qorovul_core::Language;
use qorovul_storage::ChatKind;

/// Qorovul - message moderation for chat accounts
#[derive(Parser, Debug)]
#[command(name = "qorovul", version, about)]
pub struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Word lists JSON file, overrides the lists stored in the database
    #[arg(long, global = true)]
    pub word_lists: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a text without touching any account
    Check {
        /// Text to classify
        text: String,
    },
    /// Manage accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// Manage chats
    #[command(subcommand)]
    Chat(ChatCommand),
    /// Send a message from an account through moderation
    Send {
        /// Sending account ID
        #[arg(long)]
        account: i64,
        /// Target chat ID
        #[arg(long)]
        chat: i64,
        /// Message text
        text: String,
    },
    /// Inspect or replace the word lists
    #[command(subcommand)]
    Wordlists(WordListsCommand),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Create an account
    Create {
        /// Display name
        name: String,
        /// Display language (uz, ru, en)
        #[arg(long, default_value = "uz", value_parser = parse_language)]
        language: Language,
    },
    /// Show an account and its suspension state
    Show {
        /// Account ID
        id: i64,
    },
    /// List all accounts
    List,
    /// Lift any block on an account
    Unblock {
        /// Account ID
        id: i64,
    },
    /// Show the blocks written onto an account, newest first
    History {
        /// Account ID
        id: i64,
        /// Maximum number of entries
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// Create a chat
    Create {
        /// Display name
        name: String,
        /// Owning account ID
        #[arg(long)]
        owner: i64,
        /// Chat kind (private, group, channel)
        #[arg(long, default_value = "private", value_parser = parse_chat_kind)]
        kind: ChatKind,
    },
    /// Print the latest messages of a chat
    History {
        /// Chat ID
        id: i64,
        /// Maximum number of messages
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum WordListsCommand {
    /// Print the word lists in effect as JSON
    Export,
    /// Validate a word lists file and store it in the database
    Import {
        /// JSON file to import
        file: PathBuf,
    },
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::parse(&s.to_lowercase()).ok_or_else(|| format!("unknown language '{s}'"))
}

fn parse_chat_kind(s: &str) -> Result<ChatKind, String> {
    ChatKind::parse(&s.to_lowercase()).ok_or_else(|| format!("unknown chat kind '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from([
            "qorovul", "--db", "x.db", "send", "--account", "1", "--chat", "2", "salom",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Command::Send {
                account,
                chat,
                text,
            } => {
                assert_eq!((account, chat), (1, 2));
                assert_eq!(text, "salom");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qorovul", "check", "salom", "--debug"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_account_create_language() {
        let cli =
            Cli::try_parse_from(["qorovul", "account", "create", "Olga", "--language", "RU"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Account(AccountCommand::Create {
                language: Language::Ru,
                ..
            })
        ));

        assert!(
            Cli::try_parse_from(["qorovul", "account", "create", "X", "--language", "de"])
                .is_err()
        );
    }

    #[test]
    fn test_chat_create_defaults_to_private() {
        let cli = Cli::try_parse_from(["qorovul", "chat", "create", "Dm", "--owner", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Chat(ChatCommand::Create {
                kind: ChatKind::Private,
                owner: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_send_requires_chat() {
        assert!(Cli::try_parse_from(["qorovul", "send", "--account", "1", "salom"]).is_err());
    }
}
