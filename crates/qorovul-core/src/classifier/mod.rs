//! Content classification for outgoing chat messages.
//!
//! Messages are matched against configurable phrase lists and assigned the
//! most severe offense level that applies.

mod category;
mod error;
mod keyword;
mod word_lists;

pub use category::{ClassificationResult, OffenseCategory, OffenseLevel};
pub use error::ClassifierError;
pub use keyword::ContentClassifier;
pub use word_lists::{LocalePhrases, WordLists};
