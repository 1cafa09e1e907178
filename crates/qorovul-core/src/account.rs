//! Accounts and their moderation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::OffenseLevel;
use crate::suspension::{SuspensionError, SuspensionRecord};

/// Display language chosen by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Uzbek.
    #[default]
    Uz,
    /// Russian.
    Ru,
    /// English.
    En,
}

impl Language {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uz" => Some(Language::Uz),
            "ru" => Some(Language::Ru),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// A messaging account.
///
/// The suspension record is only reachable through the methods below so a
/// block can never be half-written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Preferred display language.
    pub language: Language,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    suspension: SuspensionRecord,
}

impl Account {
    /// Creates an account with no block.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        language: Language,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            language,
            created_at,
            suspension: SuspensionRecord::clear(),
        }
    }

    /// Sets the moderation state (used when loading from storage).
    pub fn with_suspension(mut self, suspension: SuspensionRecord) -> Self {
        self.suspension = suspension;
        self
    }

    /// The account's moderation state.
    pub fn suspension(&self) -> &SuspensionRecord {
        &self.suspension
    }

    /// Blocks the account for an offense.
    pub fn suspend(
        &mut self,
        level: OffenseLevel,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), SuspensionError> {
        self.suspension.suspend(level, reason, now)
    }

    /// Removes any block on the account.
    pub fn lift_suspension(&mut self) {
        self.suspension.lift();
    }

    /// Returns true if the account may not send at `now`.
    pub fn is_currently_blocked(&self, now: DateTime<Utc>) -> bool {
        self.suspension.is_currently_blocked(now)
    }
}
