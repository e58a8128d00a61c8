//! Canonical edge keys, the weighted pair multiset, and exported edge rows.
//!
//! # Canonical form
//!
//! A co-occurrence is undirected, so `(A, B)` and `(B, A)` must count toward
//! the same edge. [`EdgeKey::new`] sorts its two members (byte order of the
//! UTF-8 strings, which equals code-point order) and every comparison and
//! hash goes through that sorted pair.
//!
//! A key whose members are equal is a self-loop. These arise when the same
//! surface text is recognized twice in one document and are kept as data.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};

use crate::aggregate::document_pairs;
use crate::document::Document;

// ---------------------------------------------------------------------------
// EdgeKey
// ---------------------------------------------------------------------------

/// An unordered pair of entity mentions in canonical (sorted) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    first: String,
    second: String,
}

impl EdgeKey {
    /// Canonicalize a pair: the lexicographically smaller member comes first.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.first == self.second
    }

    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.first, self.second)
    }
}

// ---------------------------------------------------------------------------
// EdgeMultiset
// ---------------------------------------------------------------------------

/// Occurrence counts per canonical pair, accumulated over documents.
///
/// The count for a key is the number of pair-instances generated for it,
/// not the number of documents mentioning both members. Iteration order is
/// unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeMultiset {
    counts: HashMap<EdgeKey, u64>,
}

impl EdgeMultiset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one instance of `key`.
    pub fn add(&mut self, key: EdgeKey) {
        self.add_n(key, 1);
    }

    /// Record `n` instances of `key`.
    pub fn add_n(&mut self, key: EdgeKey, n: u64) {
        if n == 0 {
            return;
        }
        *self.counts.entry(key).or_insert(0) += n;
    }

    /// Record every position pair of `doc`.
    ///
    /// All 2-combinations of positions are generated, so repeated mentions
    /// produce repeated (and possibly self-loop) keys.
    pub fn add_document(&mut self, doc: &Document) {
        for key in document_pairs(doc) {
            self.add(key);
        }
    }

    /// Fold another multiset into this one by summing counts per key.
    pub fn merge(&mut self, other: Self) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (key, count) in other.counts {
            self.add_n(key, count);
        }
    }

    /// Count for a canonical key (0 if absent).
    #[must_use]
    pub fn get(&self, key: &EdgeKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Count for an unordered pair given in either order.
    #[must_use]
    pub fn count(&self, a: &str, b: &str) -> u64 {
        self.get(&EdgeKey::new(a, b))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (total pair-instances observed).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, u64)> + '_ {
        self.counts.iter().map(|(key, count)| (key, *count))
    }
}

impl IntoIterator for EdgeMultiset {
    type Item = (EdgeKey, u64);
    type IntoIter = hash_map::IntoIter<EdgeKey, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl FromIterator<EdgeKey> for EdgeMultiset {
    fn from_iter<I: IntoIterator<Item = EdgeKey>>(iter: I) -> Self {
        let mut multiset = Self::new();
        for key in iter {
            multiset.add(key);
        }
        multiset
    }
}

// ---------------------------------------------------------------------------
// EdgeRecord
// ---------------------------------------------------------------------------

/// One exported edge: `(nodeA, nodeB, weight)`.
///
/// Field names follow the weighted edgelist CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "nodeA")]
    pub node_a: String,
    #[serde(rename = "nodeB")]
    pub node_b: String,
    pub weight: u64,
}

impl EdgeRecord {
    pub fn new(node_a: impl Into<String>, node_b: impl Into<String>, weight: u64) -> Self {
        Self {
            node_a: node_a.into(),
            node_b: node_b.into(),
            weight,
        }
    }

    /// Canonical key for this record's node pair.
    #[must_use]
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.node_a.as_str(), self.node_b.as_str())
    }
}

impl From<(EdgeKey, u64)> for EdgeRecord {
    fn from((key, weight): (EdgeKey, u64)) -> Self {
        let (node_a, node_b) = key.into_parts();
        Self {
            node_a,
            node_b,
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_independent() {
        let ab = EdgeKey::new("Alice", "Bob");
        let ba = EdgeKey::new("Bob", "Alice");
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), "Alice");
        assert_eq!(ab.second(), "Bob");
    }

    #[test]
    fn self_loop_key() {
        let key = EdgeKey::new("X", "X");
        assert!(key.is_self_loop());
        assert!(!EdgeKey::new("X", "Y").is_self_loop());
    }

    #[test]
    fn repeated_mentions_count_every_position_pair() {
        let mut multiset = EdgeMultiset::new();
        multiset.add_document(&Document::from_iter(["A", "A", "B"]));

        assert_eq!(multiset.count("A", "A"), 1);
        assert_eq!(multiset.count("A", "B"), 2);
        assert_eq!(multiset.count("B", "A"), 2);
        assert_eq!(multiset.total(), 3);
        assert_eq!(multiset.len(), 2);
    }

    #[test]
    fn merge_sums_counts() {
        let mut left: EdgeMultiset = [EdgeKey::new("A", "B"), EdgeKey::new("A", "C")]
            .into_iter()
            .collect();
        let right: EdgeMultiset = [EdgeKey::new("B", "A"), EdgeKey::new("C", "D")]
            .into_iter()
            .collect();

        left.merge(right);
        assert_eq!(left.count("A", "B"), 2);
        assert_eq!(left.count("A", "C"), 1);
        assert_eq!(left.count("C", "D"), 1);
        assert_eq!(left.total(), 4);
    }

    #[test]
    fn add_n_zero_is_noop() {
        let mut multiset = EdgeMultiset::new();
        multiset.add_n(EdgeKey::new("A", "B"), 0);
        assert!(multiset.is_empty());
    }

    #[test]
    fn record_from_key_keeps_canonical_order() {
        let record = EdgeRecord::from((EdgeKey::new("Zed", "Amy"), 4));
        assert_eq!(record.node_a, "Amy");
        assert_eq!(record.node_b, "Zed");
        assert_eq!(record.weight, 4);
        assert_eq!(record.key(), EdgeKey::new("Amy", "Zed"));
    }
}
