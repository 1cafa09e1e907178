//! Data models for storage.

use chrono::{DateTime, Utc};
use qorovul_core::{GateDecision, Language, OffenseLevel};
use serde::{Deserialize, Serialize};

/// Parameters for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Preferred display language.
    pub language: Language,
}

/// Kind of conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// One-to-one conversation.
    #[default]
    Private,
    /// Group conversation.
    Group,
    /// Broadcast channel.
    Channel,
}

impl ChatKind {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Channel => "channel",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(ChatKind::Private),
            "group" => Some(ChatKind::Group),
            "channel" => Some(ChatKind::Channel),
            _ => None,
        }
    }
}

/// A stored conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Conversation kind.
    pub kind: ChatKind,
    /// Account that created the chat.
    pub owner_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a new chat.
#[derive(Debug, Clone)]
pub struct NewChat {
    /// Display name.
    pub name: String,
    /// Conversation kind.
    pub kind: ChatKind,
    /// Owning account.
    pub owner_id: i64,
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    /// A human account.
    User,
    /// The auto-responder.
    Assistant,
    /// System notices.
    System,
}

impl SenderRole {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderRole::User => "user",
            SenderRole::Assistant => "assistant",
            SenderRole::System => "system",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(SenderRole::User),
            "assistant" => Some(SenderRole::Assistant),
            "system" => Some(SenderRole::System),
            _ => None,
        }
    }
}

/// A stored message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: i64,
    /// Conversation the message belongs to.
    pub chat_id: i64,
    /// Sending account, `None` for assistant/system messages.
    pub sender_id: Option<i64>,
    /// Sender role.
    pub sender_role: SenderRole,
    /// Message body.
    pub text: String,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
}

/// Parameters for storing a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Conversation to append to.
    pub chat_id: i64,
    /// Sending account, if any.
    pub sender_id: Option<i64>,
    /// Sender role.
    pub sender_role: SenderRole,
    /// Message body.
    pub text: String,
}

/// One block written onto an account (audit trail, no message content).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspensionEvent {
    /// Unique identifier.
    pub id: i64,
    /// Suspended account.
    pub account_id: i64,
    /// Offense level that triggered the block.
    pub level: OffenseLevel,
    /// Reason shown to the user.
    pub reason: String,
    /// End of the block, `None` if permanent.
    pub blocked_until: Option<DateTime<Utc>>,
    /// When the block was written.
    pub created_at: DateTime<Utc>,
}

/// A configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration key.
    pub key: String,
    /// Configuration value (JSON).
    pub value: serde_json::Value,
}

/// Result of submitting a message through the gate.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// What the gate decided.
    pub decision: GateDecision,
    /// Id of the stored message when accepted.
    pub message_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_kind_round_trip() {
        for kind in [ChatKind::Private, ChatKind::Group, ChatKind::Channel] {
            assert_eq!(ChatKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ChatKind::parse("forum"), None);
    }

    #[test]
    fn sender_role_round_trip() {
        for role in [SenderRole::User, SenderRole::Assistant, SenderRole::System] {
            assert_eq!(SenderRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(SenderRole::parse("bot"), None);
    }
}
