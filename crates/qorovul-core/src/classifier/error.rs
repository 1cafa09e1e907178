//! Classifier configuration errors.

use std::path::PathBuf;

use thiserror::Error;

use super::OffenseCategory;

/// Errors raised while loading word lists or building a classifier.
///
/// Classifying text never fails; only configuration does.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A phrase was empty or whitespace and would match every message.
    #[error("empty phrase in {} list for locale '{locale}'", .category.name())]
    EmptyPhrase {
        category: OffenseCategory,
        locale: String,
    },

    /// The word-list JSON could not be parsed.
    #[error("invalid word list JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The word-list file could not be read.
    #[error("failed to read word lists from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The compiled matcher exceeded the regex engine's limits.
    #[error("failed to compile phrase matcher: {0}")]
    Pattern(#[from] regex::Error),
}
