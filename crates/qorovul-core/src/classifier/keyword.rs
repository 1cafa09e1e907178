//! Phrase-list content classifier.
//!
//! Each category's phrases are compiled into one [`RegexSet`] of escaped
//! literals, so a message is scanned once per category no matter how long
//! the lists grow.
//!
//! Matching is plain substring containment on the lowercased message. There
//! is no tokenization: a listed phrase is found inside longer words too
//! ("terror" flags "terrorist", "мат" flags "математика").

use regex::RegexSet;
use tracing::debug;

use super::{ClassificationResult, ClassifierError, OffenseCategory, WordLists};

/// Compiled phrases for one category.
struct CategoryPhrases {
    category: OffenseCategory,
    /// Regex set for fast multi-phrase matching.
    regex_set: RegexSet,
    /// Lowercased phrases, index-aligned with `regex_set`.
    phrases: Vec<String>,
}

impl CategoryPhrases {
    fn build(category: OffenseCategory, lists: &WordLists) -> Result<Self, ClassifierError> {
        let phrases: Vec<String> = lists.phrases(category).map(str::to_lowercase).collect();
        let regex_set = RegexSet::new(phrases.iter().map(|p| regex::escape(p)))?;

        Ok(Self {
            category,
            regex_set,
            phrases,
        })
    }

    /// Returns the first configured phrase contained in `text`.
    fn first_match(&self, text: &str) -> Option<&str> {
        self.regex_set
            .matches(text)
            .iter()
            .next()
            .map(|idx| self.phrases[idx].as_str())
    }
}

/// Classifies message text into an offense level.
///
/// Categories are checked most severe first and the first hit wins, so a
/// message containing both a threat and an insult is a threat.
pub struct ContentClassifier {
    categories: Vec<CategoryPhrases>,
}

impl ContentClassifier {
    /// Creates a classifier using the built-in word lists.
    pub fn new() -> Self {
        Self::with_word_lists(&WordLists::builtin()).expect("built-in word lists are valid")
    }

    /// Creates a classifier from the given word lists.
    pub fn with_word_lists(lists: &WordLists) -> Result<Self, ClassifierError> {
        lists.validate()?;

        let categories = OffenseCategory::all()
            .iter()
            .map(|category| CategoryPhrases::build(*category, lists))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { categories })
    }

    /// Classifies the given text.
    ///
    /// Total over all inputs: empty or unrecognised text is clean.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let text_lower = text.to_lowercase();

        for cat in &self.categories {
            if let Some(phrase) = cat.first_match(&text_lower) {
                debug!(
                    category = cat.category.name(),
                    phrase,
                    len = text.len(),
                    "message matched word list"
                );
                return ClassificationResult::matched(cat.category, phrase);
            }
        }

        ClassificationResult::clean()
    }

    /// Number of phrases loaded for a category.
    pub fn phrase_count(&self, category: OffenseCategory) -> usize {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.phrases.len())
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::OffenseLevel;

    fn classifier() -> ContentClassifier {
        ContentClassifier::new()
    }

    fn fixture() -> ContentClassifier {
        let mut lists = WordLists::new();
        lists.add_phrase(OffenseCategory::Threat, "en", "bomb");
        lists.add_phrase(OffenseCategory::Scam, "en", "prize");
        lists.add_phrase(OffenseCategory::Profanity, "en", "dork");
        ContentClassifier::with_word_lists(&lists).unwrap()
    }

    // === Threat Tests ===

    #[test]
    fn detects_uzbek_threat() {
        let result = classifier().classify("men seni o'ldiraman");
        assert_eq!(result.level, OffenseLevel::CriticalPerm);
        assert_eq!(result.reason, "dangerous threat or terrorism indicators");
        assert_eq!(result.matched_phrase.as_deref(), Some("o'ldiraman"));
    }

    #[test]
    fn detects_russian_threat() {
        let result = classifier().classify("Я тебя УБЬЮ");
        assert_eq!(result.level, OffenseLevel::CriticalPerm);
    }

    #[test]
    fn threat_outranks_profanity() {
        let result = classifier().classify("stupid idiot, I will kill you");
        assert_eq!(result.level, OffenseLevel::CriticalPerm);
    }

    #[test]
    fn threat_outranks_scam() {
        let result = classifier().classify("winner of the terror lottery");
        assert_eq!(result.level, OffenseLevel::CriticalPerm);
    }

    // === Scam Tests ===

    #[test]
    fn detects_scam() {
        let result = classifier().classify("karta raqami yuboring, siz winner!");
        assert_eq!(result.level, OffenseLevel::Severe24h);
        assert_eq!(result.reason, "fraud attempt detected");
    }

    #[test]
    fn scam_outranks_profanity() {
        let result = classifier().classify("you stupid winner");
        assert_eq!(result.level, OffenseLevel::Severe24h);
    }

    // === Profanity Tests ===

    #[test]
    fn detects_profanity_in_each_locale() {
        for text in ["sen juda yomon odamsan", "ты дурак", "what an idiot"] {
            let result = classifier().classify(text);
            assert_eq!(result.level, OffenseLevel::Warning12h, "{text}");
            assert_eq!(result.reason, "inappropriate language used");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let upper = classifier().classify("YOMON");
        let lower = classifier().classify("yomon");
        assert_eq!(upper.level, OffenseLevel::Warning12h);
        assert_eq!(upper, lower);
    }

    #[test]
    fn configured_phrases_are_lowercased() {
        let mut lists = WordLists::new();
        lists.add_phrase(OffenseCategory::Scam, "en", "Free Money");
        let classifier = ContentClassifier::with_word_lists(&lists).unwrap();

        assert_eq!(
            classifier.classify("FREE MONEY inside").level,
            OffenseLevel::Severe24h
        );
    }

    // === Substring Semantics ===

    #[test]
    fn matches_inside_longer_words() {
        assert_eq!(
            classifier().classify("terrorist").level,
            OffenseLevel::CriticalPerm
        );
        assert_eq!(
            classifier().classify("математика").level,
            OffenseLevel::Warning12h
        );
        assert_eq!(fixture().classify("bombastic").level, OffenseLevel::CriticalPerm);
    }

    #[test]
    fn punctuation_is_not_stripped() {
        // "kill you" with a comma in between no longer contains the phrase
        assert_eq!(classifier().classify("kill, you").level, OffenseLevel::None);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let mut lists = WordLists::new();
        lists.add_phrase(OffenseCategory::Profanity, "en", "a.b");
        let classifier = ContentClassifier::with_word_lists(&lists).unwrap();

        assert_eq!(classifier.classify("axb").level, OffenseLevel::None);
        assert_eq!(classifier.classify("a.b").level, OffenseLevel::Warning12h);
    }

    // === Clean Content ===

    #[test]
    fn greeting_is_clean() {
        let result = classifier().classify("Assalomu alaykum, qandaysiz?");
        assert_eq!(result.level, OffenseLevel::None);
        assert!(result.reason.is_empty());
        assert!(result.matched_phrase.is_none());
    }

    #[test]
    fn empty_and_non_alphabetic_text_is_clean() {
        for text in ["", "   ", "12345 !!! ???", "🙂🙂🙂"] {
            assert_eq!(classifier().classify(text).level, OffenseLevel::None);
        }
    }

    #[test]
    fn long_text_is_handled() {
        let text = "salom ".repeat(50_000);
        assert_eq!(classifier().classify(&text).level, OffenseLevel::None);

        let flagged = format!("{text}winner");
        assert_eq!(classifier().classify(&flagged).level, OffenseLevel::Severe24h);
    }

    #[test]
    fn classify_is_idempotent() {
        let c = classifier();
        let text = "karta raqami yuboring";
        assert_eq!(c.classify(text), c.classify(text));
    }

    // === Configuration ===

    #[test]
    fn empty_lists_classify_everything_clean() {
        let classifier = ContentClassifier::with_word_lists(&WordLists::new()).unwrap();
        assert_eq!(
            classifier.classify("men seni o'ldiraman").level,
            OffenseLevel::None
        );
    }

    #[test]
    fn fixture_lists_replace_builtin() {
        let c = fixture();
        assert_eq!(c.classify("yomon").level, OffenseLevel::None);
        assert_eq!(c.classify("you dork").level, OffenseLevel::Warning12h);
        assert_eq!(c.classify("claim your prize").level, OffenseLevel::Severe24h);
    }

    #[test]
    fn blank_phrase_is_rejected() {
        let mut lists = WordLists::new();
        lists.add_phrase(OffenseCategory::Threat, "en", "");
        assert!(matches!(
            ContentClassifier::with_word_lists(&lists),
            Err(ClassifierError::EmptyPhrase { .. })
        ));
    }

    #[test]
    fn phrase_count_reports_loaded_lists() {
        let c = classifier();
        assert_eq!(c.phrase_count(OffenseCategory::Threat), 6);
        assert_eq!(c.phrase_count(OffenseCategory::Scam), 5);
        assert_eq!(c.phrase_count(OffenseCategory::Profanity), 13);
    }
}
