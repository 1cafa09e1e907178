//! Qorovul Core - message moderation and account suspension policy.
//!
//! Outgoing chat messages pass through a [`gate::SendGate`] before they are
//! stored. The gate classifies the text against configurable phrase lists
//! ([`classifier`]) and, on a violation, writes a block onto the sender's
//! [`suspension::SuspensionRecord`] instead of accepting the message.
//!
//! # Example
//!
//! ```
//! use qorovul_core::account::{Account, Language};
//! use qorovul_core::gate::{GateDecision, SendGate};
//!
//! let gate = SendGate::default();
//! let mut account = Account::new(1, "Aziz", Language::Uz, gate.now());
//!
//! assert_eq!(gate.submit(&mut account, "salom").unwrap(), GateDecision::Accepted);
//!
//! let decision = gate.submit(&mut account, "sen juda yomon odamsan").unwrap();
//! assert!(decision.suspended_account());
//! assert!(account.is_currently_blocked(gate.now()));
//! ```

pub mod account;
pub mod classifier;
pub mod clock;
pub mod gate;
pub mod suspension;

pub use account::{Account, Language};
pub use classifier::{
    ClassificationResult, ClassifierError, ContentClassifier, OffenseCategory, OffenseLevel,
    WordLists,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use gate::{GateDecision, SendGate};
pub use suspension::{
    suspension_expiry, suspension_message, SuspensionError, SuspensionRecord, SuspensionStatus,
};
