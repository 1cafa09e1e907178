//! Send gate: moderation run before a message is stored.
//!
//! ## Evaluation Order
//!
//! 1. Blank messages are ignored outright
//! 2. Accounts that are currently blocked are refused without classifying
//! 3. The text is classified; a violation suspends the account and the
//!    message is dropped for good
//! 4. Clean messages are accepted for storage

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::account::Account;
use crate::classifier::{ClassificationResult, ContentClassifier};
use crate::clock::{Clock, SystemClock};
use crate::suspension::SuspensionError;

/// Outcome of submitting a message through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The message is clean and may be stored.
    Accepted,
    /// The message was empty or whitespace; nothing happened.
    Ignored,
    /// The account was already blocked; the message was not classified.
    Suspended {
        /// Explanation to show the account owner.
        message: String,
    },
    /// The message broke a rule; the account is now blocked.
    Rejected {
        /// Why the message was rejected.
        classification: ClassificationResult,
        /// Explanation to show the account owner.
        message: String,
        /// End of the block, `None` if permanent.
        blocked_until: Option<DateTime<Utc>>,
    },
}

impl GateDecision {
    /// Returns a human-readable name for this decision.
    pub fn name(&self) -> &'static str {
        match self {
            GateDecision::Accepted => "Accepted",
            GateDecision::Ignored => "Ignored",
            GateDecision::Suspended { .. } => "Suspended",
            GateDecision::Rejected { .. } => "Rejected",
        }
    }

    /// Returns true if the message should be stored.
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accepted)
    }

    /// Returns true if this decision wrote a new block onto the account.
    pub fn suspended_account(&self) -> bool {
        matches!(self, GateDecision::Rejected { .. })
    }

    /// The explanation to show the sender, if the message was refused.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            GateDecision::Suspended { message } | GateDecision::Rejected { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Classifies outgoing messages and suspends offending accounts.
pub struct SendGate<C: Clock = SystemClock> {
    classifier: ContentClassifier,
    clock: C,
}

impl SendGate<SystemClock> {
    /// Creates a gate on the system clock.
    pub fn new(classifier: ContentClassifier) -> Self {
        Self::with_clock(classifier, SystemClock)
    }
}

impl Default for SendGate<SystemClock> {
    fn default() -> Self {
        Self::new(ContentClassifier::new())
    }
}

impl<C: Clock> SendGate<C> {
    /// Creates a gate with the given clock.
    pub fn with_clock(classifier: ContentClassifier, clock: C) -> Self {
        Self { classifier, clock }
    }

    /// The classifier used by this gate.
    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// The current time according to this gate's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Runs `text` from `account` through moderation.
    ///
    /// On [`GateDecision::Rejected`] the account's suspension record has
    /// already been updated; the caller persists it and drops the text.
    pub fn submit(
        &self,
        account: &mut Account,
        text: &str,
    ) -> Result<GateDecision, SuspensionError> {
        self.submit_at(account, text, self.clock.now())
    }

    /// Like [`SendGate::submit`], with the decision time supplied by the
    /// caller so anything it writes alongside shares the same instant.
    pub fn submit_at(
        &self,
        account: &mut Account,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<GateDecision, SuspensionError> {
        if text.trim().is_empty() {
            return Ok(GateDecision::Ignored);
        }

        if account.is_currently_blocked(now) {
            warn!(account_id = account.id, "send refused: account suspended");
            let message = account.suspension().message().unwrap_or_default();
            return Ok(GateDecision::Suspended { message });
        }

        let classification = self.classifier.classify(text);
        if !classification.is_violation() {
            debug!(account_id = account.id, len = text.len(), "message accepted");
            return Ok(GateDecision::Accepted);
        }

        account.suspend(classification.level, classification.reason.clone(), now)?;
        warn!(
            account_id = account.id,
            level = %classification.level,
            "message rejected"
        );

        Ok(GateDecision::Rejected {
            message: account.suspension().message().unwrap_or_default(),
            blocked_until: account.suspension().blocked_until(),
            classification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Language;
    use crate::classifier::OffenseLevel;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn gate_at(now: DateTime<Utc>) -> SendGate<FixedClock> {
        SendGate::with_clock(ContentClassifier::new(), FixedClock(now))
    }

    fn account() -> Account {
        Account::new(7, "Jasur", Language::Uz, at())
    }

    #[test]
    fn clean_message_is_accepted() {
        let mut account = account();
        let decision = gate_at(at())
            .submit(&mut account, "Assalomu alaykum, qandaysiz?")
            .unwrap();

        assert_eq!(decision, GateDecision::Accepted);
        assert!(decision.is_accepted());
        assert!(!account.suspension().is_blocked());
    }

    #[test]
    fn blank_message_is_ignored() {
        let mut account = account();
        let decision = gate_at(at()).submit(&mut account, "  \n\t").unwrap();
        assert_eq!(decision, GateDecision::Ignored);
        assert!(decision.user_message().is_none());
    }

    #[test]
    fn threat_blocks_permanently() {
        let mut account = account();
        let decision = gate_at(at())
            .submit(&mut account, "men seni o'ldiraman")
            .unwrap();

        match &decision {
            GateDecision::Rejected {
                classification,
                blocked_until,
                message,
            } => {
                assert_eq!(classification.level, OffenseLevel::CriticalPerm);
                assert_eq!(*blocked_until, None);
                assert!(message.contains("PERMANENTLY"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(decision.suspended_account());
        assert!(account.suspension().is_permanently_blocked());
    }

    #[test]
    fn insult_blocks_for_12_hours() {
        let mut account = account();
        let decision = gate_at(at())
            .submit(&mut account, "sen juda yomon odamsan")
            .unwrap();

        assert!(matches!(
            decision,
            GateDecision::Rejected { blocked_until: Some(until), .. } if until == at() + Duration::hours(12)
        ));
    }

    #[test]
    fn blocked_account_is_refused_without_classification() {
        let mut account = account();
        let gate = gate_at(at());
        gate.submit(&mut account, "karta raqami yuboring").unwrap();
        let before = account.suspension().clone();

        // A threat from a suspended account does not escalate the block
        let decision = gate.submit(&mut account, "kill you").unwrap();

        match decision {
            GateDecision::Suspended { message } => assert!(message.contains("24 hours")),
            other => panic!("expected suspended, got {other:?}"),
        }
        assert_eq!(account.suspension(), &before);
    }

    #[test]
    fn expired_block_lets_clean_messages_through() {
        let mut account = account();
        gate_at(at()).submit(&mut account, "idiot").unwrap();

        let later = gate_at(at() + Duration::hours(13));
        let decision = later.submit(&mut account, "kechirasiz").unwrap();
        assert_eq!(decision, GateDecision::Accepted);

        // The stale block stays on the record until someone lifts it
        assert!(account.suspension().is_blocked());
    }

    #[test]
    fn expired_block_can_be_replaced() {
        let mut account = account();
        gate_at(at()).submit(&mut account, "idiot").unwrap();

        let later = gate_at(at() + Duration::hours(13));
        later.submit(&mut account, "portlataman").unwrap();

        assert!(account.suspension().is_permanently_blocked());
    }

    #[test]
    fn permanent_block_outlives_any_clock() {
        let mut account = account();
        gate_at(at()).submit(&mut account, "terror").unwrap();

        let decade = gate_at(at() + Duration::days(3650));
        let decision = decade.submit(&mut account, "salom").unwrap();
        assert_eq!(decision.name(), "Suspended");
    }
}
