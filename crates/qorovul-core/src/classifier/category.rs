//! Offense categories, severity levels and classification results.

use serde::{Deserialize, Serialize};

/// Word-list categories the classifier checks, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffenseCategory {
    /// Threats of violence or terrorism.
    Threat,
    /// Fraud and scam bait.
    Scam,
    /// Profanity and insults.
    Profanity,
}

impl OffenseCategory {
    /// Returns all categories, most severe first.
    pub fn all() -> &'static [OffenseCategory] {
        &[
            OffenseCategory::Threat,
            OffenseCategory::Scam,
            OffenseCategory::Profanity,
        ]
    }

    /// Returns a human-readable name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            OffenseCategory::Threat => "Threat",
            OffenseCategory::Scam => "Scam",
            OffenseCategory::Profanity => "Profanity",
        }
    }

    /// The offense level assigned when this category matches.
    pub fn level(&self) -> OffenseLevel {
        match self {
            OffenseCategory::Threat => OffenseLevel::CriticalPerm,
            OffenseCategory::Scam => OffenseLevel::Severe24h,
            OffenseCategory::Profanity => OffenseLevel::Warning12h,
        }
    }

    /// The fixed reason reported when this category matches.
    pub fn reason(&self) -> &'static str {
        match self {
            OffenseCategory::Threat => "dangerous threat or terrorism indicators",
            OffenseCategory::Scam => "fraud attempt detected",
            OffenseCategory::Profanity => "inappropriate language used",
        }
    }
}

/// Severity assigned to a message.
///
/// Variants are declared least to most severe so the derived ordering reads
/// naturally: `CriticalPerm > Severe24h > Warning12h > None`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum OffenseLevel {
    /// No violation. Never persisted.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Profanity or insults: 12 hour block.
    #[serde(rename = "warning_12h")]
    Warning12h,
    /// Fraud or scam language: 24 hour block.
    #[serde(rename = "severe_24h")]
    Severe24h,
    /// Threats or terrorism: permanent block.
    #[serde(rename = "critical_perm")]
    CriticalPerm,
}

impl OffenseLevel {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OffenseLevel::None => "none",
            OffenseLevel::Warning12h => "warning_12h",
            OffenseLevel::Severe24h => "severe_24h",
            OffenseLevel::CriticalPerm => "critical_perm",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(OffenseLevel::None),
            "warning_12h" => Some(OffenseLevel::Warning12h),
            "severe_24h" => Some(OffenseLevel::Severe24h),
            "critical_perm" => Some(OffenseLevel::CriticalPerm),
            _ => None,
        }
    }

    /// Returns true for every level except `None`.
    pub fn is_violation(&self) -> bool {
        !matches!(self, OffenseLevel::None)
    }

    /// Returns true if this level blocks the account without expiry.
    pub fn is_permanent(&self) -> bool {
        matches!(self, OffenseLevel::CriticalPerm)
    }
}

impl std::fmt::Display for OffenseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of classifying a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Most severe level that matched.
    pub level: OffenseLevel,
    /// Human-readable reason. Empty iff `level` is `None`.
    pub reason: String,
    /// The configured phrase that triggered the level, if any.
    pub matched_phrase: Option<String>,
}

impl ClassificationResult {
    /// Creates a clean (no violation) result.
    pub fn clean() -> Self {
        Self::default()
    }

    /// Creates a result for a category match.
    pub fn matched(category: OffenseCategory, phrase: impl Into<String>) -> Self {
        Self {
            level: category.level(),
            reason: category.reason().to_string(),
            matched_phrase: Some(phrase.into()),
        }
    }

    /// Returns true if the message must be rejected.
    pub fn is_violation(&self) -> bool {
        self.level.is_violation()
    }
}
