//! Entity recognition boundary.
//!
//! # Overview
//!
//! The pipeline does not care how mentions are found, only that a
//! recognizer returns, for one document and one category, the mention
//! strings in text order. That contract is [`EntityRecognizer`].
//!
//! Categories are compared by their canonical **textual** label
//! ([`EntityLabel`], e.g. `PERSON`), never by a backend's internal numeric
//! code. Backends that carry numeric ids must translate to the label before
//! comparing.
//!
//! [`Gazetteer`] is the built-in backend: a fixed list of `(surface, label)`
//! entries matched on word boundaries.
//!
//! [`extract_documents`] runs a recognizer over raw records. Records that
//! are not text are skipped with a warning and counted; the run continues.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::document::{Document, RawDocument};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// EntityLabel
// ---------------------------------------------------------------------------

/// Canonical textual name of an entity category (`PERSON`, `ORG`, `DATE`, ...).
///
/// Parsing trims surrounding whitespace and upper-cases, so `" person "` and
/// `"PERSON"` are the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityLabel(String);

impl EntityLabel {
    /// # Errors
    ///
    /// Returns [`Error::InvalidLabel`] if the label is empty or contains
    /// whitespace.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(Error::InvalidLabel(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn person() -> Self {
        Self("PERSON".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityLabel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.0
    }
}

// ---------------------------------------------------------------------------
// EntityRecognizer
// ---------------------------------------------------------------------------

/// Finds entity mentions of one category in a document's text.
pub trait EntityRecognizer {
    /// Mention strings of category `label` in `text`, in text order.
    ///
    /// Repeated mentions must be returned every time they occur.
    ///
    /// # Errors
    ///
    /// Backend-specific failures, reported as [`Error::Recognizer`].
    fn mentions(&self, text: &str, label: &EntityLabel) -> Result<Vec<String>>;
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for &R {
    fn mentions(&self, text: &str, label: &EntityLabel) -> Result<Vec<String>> {
        (**self).mentions(text, label)
    }
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for Box<R> {
    fn mentions(&self, text: &str, label: &EntityLabel) -> Result<Vec<String>> {
        (**self).mentions(text, label)
    }
}

// ---------------------------------------------------------------------------
// Gazetteer
// ---------------------------------------------------------------------------

/// Dictionary recognizer: exact, case-sensitive surface matches.
///
/// One regex alternation is compiled per label with the longest surfaces
/// first, so `"Mary Ann Evans"` wins over `"Mary Ann"` at the same start.
/// Surfaces that begin or end with a word character are anchored on word
/// boundaries there; `"Ann"` does not match inside `"Annex"`.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    patterns: BTreeMap<EntityLabel, Regex>,
    entry_count: usize,
}

#[derive(Debug, Deserialize)]
struct GazetteerRow {
    text: String,
    label: String,
}

impl Gazetteer {
    /// Build from `(surface, label)` entries. Duplicate entries collapse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recognizer`] if the combined pattern cannot compile.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, EntityLabel)>,
        S: Into<String>,
    {
        let mut by_label: BTreeMap<EntityLabel, Vec<String>> = BTreeMap::new();
        for (surface, label) in entries {
            let surface = surface.into();
            if surface.trim().is_empty() {
                continue;
            }
            by_label.entry(label).or_default().push(surface);
        }

        let mut patterns = BTreeMap::new();
        let mut entry_count = 0;
        for (label, mut surfaces) in by_label {
            surfaces.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            surfaces.dedup();
            entry_count += surfaces.len();

            let alternation = surfaces
                .iter()
                .map(|s| anchored(s))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&alternation)
                .map_err(|e| Error::Recognizer(format!("gazetteer pattern for {label}: {e}")))?;
            patterns.insert(label, regex);
        }

        Ok(Self {
            patterns,
            entry_count,
        })
    }

    /// Load entries from a CSV with a `text,label` header.
    ///
    /// # Errors
    ///
    /// I/O and CSV errors, invalid labels, or a pattern compile failure.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries = Vec::new();
        for row in csv.deserialize::<GazetteerRow>() {
            let row = row?;
            entries.push((row.text, EntityLabel::new(&row.label)?));
        }
        Self::new(entries)
    }

    /// Load entries from a `text,label` CSV file.
    ///
    /// # Errors
    ///
    /// See [`Gazetteer::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let gazetteer = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            entries = gazetteer.entry_count,
            labels = gazetteer.patterns.len(),
            "loaded gazetteer"
        );
        Ok(gazetteer)
    }

    /// Number of distinct `(surface, label)` entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entry_count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Labels this gazetteer can recognize.
    pub fn labels(&self) -> impl Iterator<Item = &EntityLabel> {
        self.patterns.keys()
    }
}

impl EntityRecognizer for Gazetteer {
    fn mentions(&self, text: &str, label: &EntityLabel) -> Result<Vec<String>> {
        Ok(self.patterns.get(label).map_or_else(Vec::new, |regex| {
            regex
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect()
        }))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn anchored(surface: &str) -> String {
    let mut pattern = String::with_capacity(surface.len() + 8);
    if surface.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(surface));
    if surface.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Documents produced from a batch of raw records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// One document per text record, in input order.
    pub documents: Vec<Document>,
    /// Records skipped because they were not text.
    pub skipped: usize,
}

/// Run `recognizer` over every text record, skipping non-text ones.
///
/// # Errors
///
/// Propagates recognizer failures; non-text records are never errors.
#[instrument(skip(raw, recognizer), fields(records = raw.len()))]
pub fn extract_documents<R>(
    raw: &[RawDocument],
    recognizer: &R,
    label: &EntityLabel,
) -> Result<Extraction>
where
    R: EntityRecognizer + ?Sized,
{
    let mut extraction = Extraction::default();

    for (index, record) in raw.iter().enumerate() {
        match record {
            RawDocument::Text(text) => {
                let mentions = recognizer.mentions(text, label)?;
                extraction.documents.push(Document::new(mentions));
            }
            RawDocument::NonText { reason } => {
                warn!(record = index, reason = %reason, "record is not text; skipping it");
                extraction.skipped += 1;
            }
        }
    }

    debug!(
        documents = extraction.documents.len(),
        skipped = extraction.skipped,
        "extracted entity mentions"
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> EntityLabel {
        EntityLabel::new(s).expect("valid label")
    }

    fn people() -> Gazetteer {
        Gazetteer::new([
            ("Alice", label("PERSON")),
            ("Bob", label("PERSON")),
            ("Mary Ann", label("PERSON")),
            ("Mary Ann Evans", label("PERSON")),
            ("Ann", label("PERSON")),
            ("London", label("GPE")),
        ])
        .expect("gazetteer builds")
    }

    #[test]
    fn label_is_canonical_uppercase() {
        assert_eq!(label(" person ").as_str(), "PERSON");
        assert_eq!(label("PERSON"), EntityLabel::person());
        assert!(EntityLabel::new("").is_err());
        assert!(EntityLabel::new("WORK OF ART").is_err());
    }

    #[test]
    fn mentions_in_text_order_with_repeats() {
        let g = people();
        let found = g
            .mentions("Bob met Alice, then Bob left London.", &label("PERSON"))
            .expect("recognize");
        assert_eq!(found, vec!["Bob", "Alice", "Bob"]);
    }

    #[test]
    fn longest_surface_wins() {
        let g = people();
        let found = g
            .mentions("Mary Ann Evans wrote as George Eliot.", &label("PERSON"))
            .expect("recognize");
        assert_eq!(found, vec!["Mary Ann Evans"]);
    }

    #[test]
    fn word_boundaries_respected() {
        let g = people();
        let found = g
            .mentions("The Annex and Bobby", &label("PERSON"))
            .expect("recognize");
        assert!(found.is_empty(), "got {found:?}");
    }

    #[test]
    fn label_filters_category() {
        let g = people();
        let places = g
            .mentions("Alice flew to London.", &label("gpe"))
            .expect("recognize");
        assert_eq!(places, vec!["London"]);

        let unknown = g.mentions("Alice", &label("DATE")).expect("recognize");
        assert!(unknown.is_empty());
    }

    #[test]
    fn surfaces_with_punctuation_are_escaped() {
        let g = Gazetteer::new([("Dr. Who?", label("PERSON"))]).expect("builds");
        let found = g
            .mentions("Is Dr. Who? here, or Dr Who?", &label("PERSON"))
            .expect("recognize");
        assert_eq!(found, vec!["Dr. Who?"]);
    }

    #[test]
    fn gazetteer_loads_from_csv() {
        let csv = "text,label\nAlice,person\nBob, PERSON \nAcme,ORG\n";
        let g = Gazetteer::from_reader(csv.as_bytes()).expect("load");
        assert_eq!(g.len(), 3);
        let labels: Vec<&str> = g.labels().map(EntityLabel::as_str).collect();
        assert_eq!(labels, vec!["ORG", "PERSON"]);
    }

    #[test]
    fn extraction_skips_non_text() {
        let raw = vec![
            RawDocument::from("Alice and Bob"),
            RawDocument::non_text("empty cell"),
            RawDocument::from("Bob alone"),
        ];
        let extraction = extract_documents(&raw, &people(), &label("PERSON")).expect("extract");
        assert_eq!(extraction.skipped, 1);
        assert_eq!(extraction.documents.len(), 2);
        assert_eq!(extraction.documents[0].mentions(), ["Alice", "Bob"]);
        assert_eq!(extraction.documents[1].mentions(), ["Bob"]);
    }

    struct Failing;

    impl EntityRecognizer for Failing {
        fn mentions(&self, _text: &str, _label: &EntityLabel) -> Result<Vec<String>> {
            Err(Error::Recognizer("model not loaded".into()))
        }
    }

    #[test]
    fn recognizer_errors_propagate() {
        let raw = vec![RawDocument::from("anything")];
        let err = extract_documents(&raw, &Failing, &EntityLabel::person())
            .expect_err("recognizer failure is fatal");
        assert!(matches!(err, Error::Recognizer(_)));
    }
}
