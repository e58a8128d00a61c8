//! Per-document entity mentions and the raw records they come from.

/// A raw input record as produced by ingestion.
///
/// Records that could not be read as text (an empty CSV cell, invalid
/// UTF-8) are kept as [`RawDocument::NonText`] so the recognizer stage can
/// skip them with a warning instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDocument {
    Text(String),
    NonText { reason: String },
}

impl RawDocument {
    /// Build a non-text sentinel with a short reason for the skip warning.
    pub fn non_text(reason: impl Into<String>) -> Self {
        Self::NonText {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NonText { .. } => None,
        }
    }
}

impl From<String> for RawDocument {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawDocument {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// The ordered entity mentions recognized in one document.
///
/// Duplicates are meaningful: the same surface text recognized twice counts
/// as two mentions. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    mentions: Vec<String>,
}

impl Document {
    #[must_use]
    pub const fn new(mentions: Vec<String>) -> Self {
        Self { mentions }
    }

    #[must_use]
    pub fn mentions(&self) -> &[String] {
        &self.mentions
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.mentions.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Number of position pairs this document yields: `C(len, 2)`.
    #[must_use]
    pub const fn pair_count(&self) -> u64 {
        let n = self.mentions.len() as u64;
        n * n.saturating_sub(1) / 2
    }
}

impl<S: Into<String>> FromIterator<S> for Document {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_count_is_binomial() {
        assert_eq!(Document::default().pair_count(), 0);
        assert_eq!(Document::from_iter(["A"]).pair_count(), 0);
        assert_eq!(Document::from_iter(["A", "B"]).pair_count(), 1);
        assert_eq!(Document::from_iter(["A", "A", "B"]).pair_count(), 3);

        let five = Document::from_iter(["A", "B", "C", "D", "E"]);
        assert_eq!(five.pair_count(), 10);
    }

    #[test]
    fn non_text_has_no_text() {
        let raw = RawDocument::non_text("empty cell");
        assert!(raw.as_text().is_none());
        assert_eq!(RawDocument::from("hi").as_text(), Some("hi"));
    }
}
