//! Account suspension policy.
//!
//! Maps an offense level to a block duration and a user-facing explanation,
//! and owns the [`SuspensionRecord`] kept on every account.
//!
//! ## Record invariants
//!
//! - A permanent block is also a block and has no expiry.
//! - A temporary block has an expiry, which was in the future when written.
//! - Every block has a non-empty reason and the offense level that caused it.
//!
//! Fields are private and only [`SuspensionRecord::suspend`],
//! [`SuspensionRecord::from_parts`] and [`SuspensionRecord::lift`] write them.
//! Nothing here lifts a block on its own: an expired temporary block stays on
//! the record and [`SuspensionRecord::is_currently_blocked`] interprets it.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::classifier::OffenseLevel;

/// Block length for [`OffenseLevel::Warning12h`].
pub const WARNING_BLOCK_HOURS: i64 = 12;

/// Block length for [`OffenseLevel::Severe24h`].
pub const SEVERE_BLOCK_HOURS: i64 = 24;

/// Errors raised when writing or restoring a suspension record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuspensionError {
    /// `OffenseLevel::None` cannot suspend an account.
    #[error("offense level 'none' cannot suspend an account")]
    NotAViolation,

    /// A block was written without a reason.
    #[error("block reason cannot be empty")]
    EmptyReason,

    /// A stored record breaks the record invariants.
    #[error("inconsistent suspension record: {0}")]
    Inconsistent(String),

    /// The new block would end before the active one.
    #[error("an active {active} block cannot be replaced by {requested}")]
    WouldDowngrade {
        /// Level of the block in force.
        active: OffenseLevel,
        /// Level that was requested.
        requested: OffenseLevel,
    },
}

/// Computes when a suspension for `level` ends.
///
/// Returns `None` for a permanent block.
///
/// # Panics
/// Panics if `level` is [`OffenseLevel::None`]; callers must only take the
/// suspension path for violations.
pub fn suspension_expiry(level: OffenseLevel, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match level {
        OffenseLevel::Warning12h => Some(now + Duration::hours(WARNING_BLOCK_HOURS)),
        OffenseLevel::Severe24h => Some(now + Duration::hours(SEVERE_BLOCK_HOURS)),
        OffenseLevel::CriticalPerm => None,
        OffenseLevel::None => panic!("suspension_expiry called with OffenseLevel::None"),
    }
}

/// Builds the explanation shown to a suspended user.
///
/// Always English, regardless of the account's language preference.
///
/// # Panics
/// Panics if `level` is [`OffenseLevel::None`].
pub fn suspension_message(reason: &str, level: OffenseLevel) -> String {
    match level {
        OffenseLevel::CriticalPerm => {
            format!("Your account has been PERMANENTLY blocked for \"{reason}\".")
        }
        OffenseLevel::Severe24h => {
            format!("Your account has been blocked for 24 hours for \"{reason}\".")
        }
        OffenseLevel::Warning12h => {
            format!("Your account has been blocked for 12 hours for \"{reason}\".")
        }
        OffenseLevel::None => panic!("suspension_message called with OffenseLevel::None"),
    }
}

/// Read-time view of a suspension record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspensionStatus {
    /// Not blocked.
    Clear,
    /// Temporarily blocked until the given instant.
    Temporary { until: DateTime<Utc> },
    /// Permanently blocked.
    Permanent,
    /// Was temporarily blocked; the block ran out and has not been lifted.
    Expired { until: DateTime<Utc> },
}

impl SuspensionStatus {
    /// Returns a human-readable name for this status.
    pub fn name(&self) -> &'static str {
        match self {
            SuspensionStatus::Clear => "Clear",
            SuspensionStatus::Temporary { .. } => "Temporary",
            SuspensionStatus::Permanent => "Permanent",
            SuspensionStatus::Expired { .. } => "Expired",
        }
    }
}

/// Moderation state of one account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SuspensionRecord {
    is_blocked: bool,
    is_permanently_blocked: bool,
    block_reason: String,
    blocked_until: Option<DateTime<Utc>>,
    level: Option<OffenseLevel>,
}

impl SuspensionRecord {
    /// Creates a record with no block.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Restores a record from stored fields, checking the invariants.
    pub fn from_parts(
        is_blocked: bool,
        is_permanently_blocked: bool,
        block_reason: impl Into<String>,
        blocked_until: Option<DateTime<Utc>>,
        level: Option<OffenseLevel>,
    ) -> Result<Self, SuspensionError> {
        let record = Self {
            is_blocked,
            is_permanently_blocked,
            block_reason: block_reason.into(),
            blocked_until,
            level,
        };
        record.check()?;
        Ok(record)
    }

    fn check(&self) -> Result<(), SuspensionError> {
        if !self.is_blocked {
            if self.is_permanently_blocked {
                return Err(SuspensionError::Inconsistent(
                    "permanent block without block flag".into(),
                ));
            }
            return Ok(());
        }

        if self.block_reason.trim().is_empty() {
            return Err(SuspensionError::EmptyReason);
        }

        let level = match self.level {
            Some(level) if level.is_violation() => level,
            _ => {
                return Err(SuspensionError::Inconsistent(
                    "block without an offense level".into(),
                ))
            }
        };

        if level.is_permanent() != self.is_permanently_blocked {
            return Err(SuspensionError::Inconsistent(format!(
                "level {level} disagrees with permanent flag"
            )));
        }

        match (self.is_permanently_blocked, self.blocked_until) {
            (true, Some(_)) => Err(SuspensionError::Inconsistent(
                "permanent block with an expiry".into(),
            )),
            (false, None) => Err(SuspensionError::Inconsistent(
                "temporary block without an expiry".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Blocks the account for `level`.
    ///
    /// Replaces a lapsed block. A block still in force at `now` is only
    /// replaced by one that lasts at least as long; anything shorter is
    /// refused with [`SuspensionError::WouldDowngrade`] and the record is
    /// left untouched. Use [`SuspensionRecord::lift`] to clear a block.
    pub fn suspend(
        &mut self,
        level: OffenseLevel,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), SuspensionError> {
        if !level.is_violation() {
            return Err(SuspensionError::NotAViolation);
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(SuspensionError::EmptyReason);
        }

        let blocked_until = suspension_expiry(level, now);
        if self.is_currently_blocked(now) {
            let shorter = match (self.blocked_until, blocked_until) {
                (None, _) => !level.is_permanent(),
                (Some(_), None) => false,
                (Some(active), Some(requested)) => requested < active,
            };
            if shorter {
                return Err(SuspensionError::WouldDowngrade {
                    active: self.level.unwrap_or_default(),
                    requested: level,
                });
            }
        }

        warn!(%level, reason = %reason, ?blocked_until, "account suspended");

        *self = Self {
            is_blocked: true,
            is_permanently_blocked: level.is_permanent(),
            block_reason: reason,
            blocked_until,
            level: Some(level),
        };
        Ok(())
    }

    /// Removes any block. Only called by an explicit administrative action.
    pub fn lift(&mut self) {
        *self = Self::clear();
    }

    /// Returns true if the account may not send at `now`.
    ///
    /// Permanent blocks always apply; temporary blocks apply until their
    /// expiry passes.
    pub fn is_currently_blocked(&self, now: DateTime<Utc>) -> bool {
        if self.is_permanently_blocked {
            return true;
        }
        match (self.is_blocked, self.blocked_until) {
            (true, Some(until)) => now < until,
            _ => false,
        }
    }

    /// Classifies the record at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> SuspensionStatus {
        if self.is_permanently_blocked {
            return SuspensionStatus::Permanent;
        }
        match (self.is_blocked, self.blocked_until) {
            (true, Some(until)) if now < until => SuspensionStatus::Temporary { until },
            (true, Some(until)) => SuspensionStatus::Expired { until },
            _ => SuspensionStatus::Clear,
        }
    }

    /// Time left on a temporary block, if one is active.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self.status(now) {
            SuspensionStatus::Temporary { until } => Some(until - now),
            _ => None,
        }
    }

    /// The explanation to show the account owner, if blocked.
    pub fn message(&self) -> Option<String> {
        match (self.is_blocked, self.level) {
            (true, Some(level)) if level.is_violation() => {
                Some(suspension_message(&self.block_reason, level))
            }
            _ => None,
        }
    }

    /// Whether the block flag is set (regardless of expiry).
    pub fn is_blocked(&self) -> bool {
        self.is_blocked
    }

    /// Whether the block is permanent.
    pub fn is_permanently_blocked(&self) -> bool {
        self.is_permanently_blocked
    }

    /// Reason given for the block. Empty when not blocked.
    pub fn block_reason(&self) -> &str {
        &self.block_reason
    }

    /// When a temporary block ends.
    pub fn blocked_until(&self) -> Option<DateTime<Utc>> {
        self.blocked_until
    }

    /// Offense level that caused the block.
    pub fn level(&self) -> Option<OffenseLevel> {
        self.level
    }
}
