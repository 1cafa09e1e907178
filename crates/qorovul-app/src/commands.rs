//! Command execution.
//!
//! Output goes to a caller-supplied writer; logging goes through `tracing`.

use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use qorovul_core::{
    suspension_message, Account, Clock, ContentClassifier, GateDecision, OffenseCategory,
    SendGate, SuspensionStatus, SystemClock, WordLists,
};
use qorovul_storage::{Database, NewAccount, NewChat, SenderRole};
use tracing::info;

use crate::cli::{AccountCommand, ChatCommand, Command, WordListsCommand};

/// Where the word lists in effect were loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordListSource {
    /// A `--word-lists` file.
    File,
    /// The `word_lists` config row.
    Database,
    /// The lists compiled into the binary.
    Builtin,
}

impl fmt::Display for WordListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WordListSource::File => "file",
            WordListSource::Database => "database",
            WordListSource::Builtin => "builtin",
        })
    }
}

/// Resolve the word lists: file, then database, then built-in.
pub fn load_word_lists(db: &Database, file: Option<&Path>) -> Result<(WordLists, WordListSource)> {
    if let Some(path) = file {
        let lists = WordLists::from_file(path)
            .with_context(|| format!("failed to load word lists from {}", path.display()))?;
        return Ok((lists, WordListSource::File));
    }

    match db
        .get_word_lists()
        .context("stored word lists are unreadable")?
    {
        Some(lists) => Ok((lists, WordListSource::Database)),
        None => Ok((WordLists::builtin(), WordListSource::Builtin)),
    }
}

/// Database plus the moderation gate built from the effective word lists.
pub struct App<C: Clock = SystemClock> {
    db: Database,
    word_lists: WordLists,
    gate: SendGate<C>,
}

impl App<SystemClock> {
    /// Open the app on the system clock.
    pub fn open(db: Database, word_lists_file: Option<&Path>) -> Result<Self> {
        let (lists, source) = load_word_lists(&db, word_lists_file)?;
        info!(%source, "word lists loaded");
        Self::with_clock(db, lists, SystemClock)
    }
}

impl<C: Clock> App<C> {
    /// Build the app from explicit word lists and clock.
    pub fn with_clock(db: Database, word_lists: WordLists, clock: C) -> Result<Self> {
        let classifier =
            ContentClassifier::with_word_lists(&word_lists).context("invalid word lists")?;
        Ok(Self {
            db,
            word_lists,
            gate: SendGate::with_clock(classifier, clock),
        })
    }

    /// Execute one command.
    pub fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Check { text } => self.check(&text, out),
            Command::Account(cmd) => self.account(cmd, out),
            Command::Chat(cmd) => self.chat(cmd, out),
            Command::Send {
                account,
                chat,
                text,
            } => self.send(account, chat, &text, out),
            Command::Wordlists(cmd) => self.word_lists(cmd, out),
        }
    }

    fn check(&self, text: &str, out: &mut impl Write) -> Result<()> {
        let result = self.gate.classifier().classify(text);

        writeln!(out, "level: {}", result.level)?;
        if !result.is_violation() {
            writeln!(out, "clean")?;
            return Ok(());
        }

        writeln!(out, "reason: {}", result.reason)?;
        if let Some(phrase) = &result.matched_phrase {
            writeln!(out, "matched: {phrase}")?;
        }
        writeln!(
            out,
            "message: {}",
            suspension_message(&result.reason, result.level)
        )?;
        Ok(())
    }

    fn account(&self, cmd: AccountCommand, out: &mut impl Write) -> Result<()> {
        match cmd {
            AccountCommand::Create { name, language } => {
                let id = self.db.create_account(NewAccount { name, language })?;
                writeln!(out, "created account {id}")?;
            }
            AccountCommand::Show { id } => {
                let account = self.require_account(id)?;
                self.print_account(&account, out)?;
            }
            AccountCommand::List => {
                let now = self.gate.now();
                for account in self.db.get_all_accounts()? {
                    writeln!(
                        out,
                        "{:>4}  {:<20} {}  {}",
                        account.id,
                        account.name,
                        account.language.as_str(),
                        account.suspension().status(now).name()
                    )?;
                }
            }
            AccountCommand::Unblock { id } => {
                self.db
                    .lift_suspension(id)
                    .with_context(|| format!("failed to unblock account {id}"))?;
                writeln!(out, "account {id} unblocked")?;
            }
            AccountCommand::History { id, limit } => {
                self.require_account(id)?;
                let events = self.db.get_suspension_history(id, limit)?;
                if events.is_empty() {
                    writeln!(out, "no suspensions")?;
                }
                for event in events {
                    writeln!(
                        out,
                        "{}  {:<13} {}  ({})",
                        format_time(event.created_at),
                        event.level,
                        event.reason,
                        until(event.blocked_until)
                    )?;
                }
            }
        }
        Ok(())
    }

    fn print_account(&self, account: &Account, out: &mut impl Write) -> Result<()> {
        let now = self.gate.now();
        let record = account.suspension();

        writeln!(out, "id: {}", account.id)?;
        writeln!(out, "name: {}", account.name)?;
        writeln!(out, "language: {}", account.language.as_str())?;
        writeln!(out, "created: {}", format_time(account.created_at))?;
        writeln!(out, "status: {}", record.status(now).name())?;

        match record.status(now) {
            SuspensionStatus::Clear => {}
            SuspensionStatus::Permanent => {
                writeln!(out, "reason: {}", record.block_reason())?;
            }
            SuspensionStatus::Temporary { until } => {
                writeln!(out, "reason: {}", record.block_reason())?;
                writeln!(out, "until: {}", format_time(until))?;
                if let Some(remaining) = record.remaining(now) {
                    writeln!(
                        out,
                        "remaining: {}h {}m",
                        remaining.num_hours(),
                        remaining.num_minutes() % 60
                    )?;
                }
            }
            SuspensionStatus::Expired { until } => {
                writeln!(out, "reason: {}", record.block_reason())?;
                writeln!(out, "expired: {}", format_time(until))?;
            }
        }
        Ok(())
    }

    fn chat(&self, cmd: ChatCommand, out: &mut impl Write) -> Result<()> {
        match cmd {
            ChatCommand::Create { name, owner, kind } => {
                self.require_account(owner)?;
                let id = self.db.create_chat(NewChat {
                    name,
                    kind,
                    owner_id: owner,
                })?;
                writeln!(out, "created chat {id}")?;
            }
            ChatCommand::History { id, limit } => {
                if self.db.get_chat(id)?.is_none() {
                    bail!("chat {id} not found");
                }
                for message in self.db.get_messages(id, limit)? {
                    let sender = match (message.sender_role, message.sender_id) {
                        (SenderRole::User, Some(account)) => format!("#{account}"),
                        (role, _) => role.as_str().to_string(),
                    };
                    writeln!(
                        out,
                        "[{}] {}: {}",
                        format_time(message.created_at),
                        sender,
                        message.text
                    )?;
                }
            }
        }
        Ok(())
    }

    fn send(&self, account: i64, chat: i64, text: &str, out: &mut impl Write) -> Result<()> {
        let outcome = self.db.submit_message(&self.gate, account, chat, text)?;

        match (&outcome.decision, outcome.message_id) {
            (GateDecision::Accepted, Some(id)) => writeln!(out, "accepted (message {id})")?,
            (GateDecision::Accepted, None) => writeln!(out, "accepted")?,
            (GateDecision::Ignored, _) => writeln!(out, "ignored: empty message")?,
            (GateDecision::Suspended { message }, _) => writeln!(out, "suspended: {message}")?,
            (GateDecision::Rejected { message, .. }, _) => writeln!(out, "rejected: {message}")?,
        }
        Ok(())
    }

    fn word_lists(&self, cmd: WordListsCommand, out: &mut impl Write) -> Result<()> {
        match cmd {
            WordListsCommand::Export => {
                writeln!(out, "{}", self.word_lists.to_json_pretty()?)?;
            }
            WordListsCommand::Import { file } => {
                let lists = WordLists::from_file(&file)
                    .with_context(|| format!("failed to load word lists from {}", file.display()))?;
                self.db.set_word_lists(&lists)?;
                for category in OffenseCategory::all() {
                    writeln!(
                        out,
                        "{}: {} phrases",
                        category.name(),
                        lists.len(*category)
                    )?;
                }
            }
        }
        Ok(())
    }

    fn require_account(&self, id: i64) -> Result<Account> {
        self.db
            .get_account(id)?
            .with_context(|| format!("account {id} not found"))
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn until(blocked_until: Option<DateTime<Utc>>) -> String {
    match blocked_until {
        Some(t) => format!("until {}", format_time(t)),
        None => "permanent".to_string(),
    }
}
