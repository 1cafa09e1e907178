//! Word-list configuration for the content classifier.
//!
//! Lists are plain data: one ordered phrase list per locale, per category.
//! They serialize to JSON so operators can ship new lists without a rebuild:
//!
//! ```json
//! {
//!   "threat":    { "uz": ["o'ldiraman"], "en": ["kill you"] },
//!   "scam":      { "uz": ["karta raqami"] },
//!   "profanity": { "en": ["idiot"] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClassifierError, OffenseCategory};

/// Phrases for one category, keyed by locale code (`"uz"`, `"ru"`, `"en"`, ...).
pub type LocalePhrases = BTreeMap<String, Vec<String>>;

/// Phrase lists for every offense category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordLists {
    /// Threat and terrorism phrases.
    #[serde(default)]
    pub threat: LocalePhrases,
    /// Fraud and scam phrases.
    #[serde(default)]
    pub scam: LocalePhrases,
    /// Profanity and insult words.
    #[serde(default)]
    pub profanity: LocalePhrases,
}

impl WordLists {
    /// Creates an empty set of lists. Classifies everything as clean.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in lists for Uzbek, Russian and English.
    pub fn builtin() -> Self {
        let mut lists = Self::new();

        lists.extend(OffenseCategory::Threat, "uz", ["o'ldiraman", "portlataman"]);
        lists.extend(OffenseCategory::Threat, "ru", ["убью", "взорву"]);
        lists.extend(OffenseCategory::Threat, "en", ["kill you", "terror"]);

        lists.extend(OffenseCategory::Scam, "uz", ["karta raqami", "pul yutdingiz"]);
        lists.extend(OffenseCategory::Scam, "en", ["scam", "fake click", "winner"]);

        lists.extend(
            OffenseCategory::Profanity,
            "uz",
            ["yomon", "haqorat", "so'kish", "iflos", "jinni"],
        );
        lists.extend(
            OffenseCategory::Profanity,
            "ru",
            ["плохой", "мат", "дурак", "оскорбление"],
        );
        lists.extend(
            OffenseCategory::Profanity,
            "en",
            ["badword", "idiot", "stupid", "curse"],
        );

        lists
    }

    /// Parses lists from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ClassifierError> {
        let lists: Self = serde_json::from_str(json)?;
        lists.validate()?;
        Ok(lists)
    }

    /// Parses lists from a JSON value (e.g. a stored config row).
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ClassifierError> {
        let lists: Self = serde_json::from_value(value)?;
        lists.validate()?;
        Ok(lists)
    }

    /// Loads lists from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ClassifierError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ClassifierError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the per-locale lists for a category.
    pub fn category(&self, category: OffenseCategory) -> &LocalePhrases {
        match category {
            OffenseCategory::Threat => &self.threat,
            OffenseCategory::Scam => &self.scam,
            OffenseCategory::Profanity => &self.profanity,
        }
    }

    fn category_mut(&mut self, category: OffenseCategory) -> &mut LocalePhrases {
        match category {
            OffenseCategory::Threat => &mut self.threat,
            OffenseCategory::Scam => &mut self.scam,
            OffenseCategory::Profanity => &mut self.profanity,
        }
    }

    /// Appends a phrase to a category's list for a locale.
    pub fn add_phrase(
        &mut self,
        category: OffenseCategory,
        locale: impl Into<String>,
        phrase: impl Into<String>,
    ) {
        self.category_mut(category)
            .entry(locale.into())
            .or_default()
            .push(phrase.into());
    }

    /// Appends several phrases to a category's list for a locale.
    pub fn extend<I, S>(&mut self, category: OffenseCategory, locale: &str, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_mut(category)
            .entry(locale.to_string())
            .or_default()
            .extend(phrases.into_iter().map(Into::into));
    }

    /// All phrases of a category, every locale together.
    pub fn phrases(&self, category: OffenseCategory) -> impl Iterator<Item = &str> {
        self.category(category)
            .values()
            .flat_map(|phrases| phrases.iter().map(String::as_str))
    }

    /// Number of phrases in a category across all locales.
    pub fn len(&self, category: OffenseCategory) -> usize {
        self.category(category).values().map(Vec::len).sum()
    }

    /// Returns true if no category has any phrase.
    pub fn is_empty(&self) -> bool {
        OffenseCategory::all().iter().all(|c| self.len(*c) == 0)
    }

    /// Rejects blank phrases, which would match every message.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        for category in OffenseCategory::all() {
            for (locale, phrases) in self.category(*category) {
                if phrases.iter().any(|p| p.trim().is_empty()) {
                    return Err(ClassifierError::EmptyPhrase {
                        category: *category,
                        locale: locale.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
