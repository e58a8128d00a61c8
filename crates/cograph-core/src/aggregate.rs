//! Edge aggregation: documents → weighted pair multiset.
//!
//! # Overview
//!
//! Every document contributes all 2-combinations of its mention
//! *positions*. Each pair is canonicalized into an [`EdgeKey`] and counted
//! in a single [`EdgeMultiset`], so the final count for a key is the number
//! of pair-instances seen across the whole corpus.
//!
//! ```text
//! ["Alice", "Bob"]           → (Alice,Bob)
//! ["Alice", "Bob", "Carol"]  → (Alice,Bob) (Alice,Carol) (Bob,Carol)
//!                            ⇒ (Alice,Bob)=2 (Alice,Carol)=1 (Bob,Carol)=1
//! ```
//!
//! Documents with fewer than two mentions contribute nothing.
//!
//! # Parallel aggregation
//!
//! [`aggregate_parallel`] splits the documents across rayon workers. Each
//! worker folds into its own partial multiset and partials are merged by
//! summing counts per key, so the result equals [`aggregate`] exactly.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::document::Document;
use crate::edge::{EdgeKey, EdgeMultiset};

/// Canonical pair keys for one document, in generation order.
pub fn document_pairs(doc: &Document) -> impl Iterator<Item = EdgeKey> + '_ {
    let mentions = doc.mentions();
    mentions.iter().enumerate().flat_map(move |(i, a)| {
        mentions[i + 1..]
            .iter()
            .map(move |b| EdgeKey::new(a.as_str(), b.as_str()))
    })
}

/// Aggregate documents into a weighted pair multiset on the current thread.
#[must_use]
#[instrument(skip_all)]
pub fn aggregate<'a, I>(documents: I) -> EdgeMultiset
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut multiset = EdgeMultiset::new();
    let mut seen = 0usize;
    for doc in documents {
        multiset.add_document(doc);
        seen += 1;
    }
    debug!(
        documents = seen,
        distinct_pairs = multiset.len(),
        pair_instances = multiset.total(),
        "aggregated co-occurrence pairs"
    );
    multiset
}

/// Aggregate documents using rayon, merging per-worker partial multisets.
#[must_use]
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn aggregate_parallel(documents: &[Document]) -> EdgeMultiset {
    let multiset = documents
        .par_iter()
        .fold(EdgeMultiset::new, |mut partial, doc| {
            partial.add_document(doc);
            partial
        })
        .reduce(EdgeMultiset::new, |mut left, right| {
            left.merge(right);
            left
        });
    debug!(
        distinct_pairs = multiset.len(),
        pair_instances = multiset.total(),
        "aggregated co-occurrence pairs in parallel"
    );
    multiset
}

/// Total pair-instances the documents will generate: `Σ C(len, 2)`.
#[must_use]
pub fn pair_count<'a, I>(documents: I) -> u64
where
    I: IntoIterator<Item = &'a Document>,
{
    documents.into_iter().map(Document::pair_count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Document> {
        raw.iter()
            .map(|mentions| mentions.iter().copied().collect())
            .collect()
    }

    #[test]
    fn alice_bob_carol_scenario() {
        let documents = docs(&[&["Alice", "Bob"], &["Alice", "Bob", "Carol"]]);
        let multiset = aggregate(&documents);

        assert_eq!(multiset.count("Alice", "Bob"), 2);
        assert_eq!(multiset.count("Alice", "Carol"), 1);
        assert_eq!(multiset.count("Bob", "Carol"), 1);
        assert_eq!(multiset.len(), 3);
    }

    #[test]
    fn reversed_pairs_share_a_key() {
        let documents = docs(&[&["A", "B"], &["B", "A"]]);
        let multiset = aggregate(&documents);
        assert_eq!(multiset.len(), 1);
        assert_eq!(multiset.count("A", "B"), 2);
    }

    #[test]
    fn short_documents_contribute_nothing() {
        let documents = docs(&[&[], &["Solo"]]);
        let multiset = aggregate(&documents);
        assert!(multiset.is_empty());
        assert_eq!(pair_count(&documents), 0);
    }

    #[test]
    fn no_documents_is_empty() {
        let multiset = aggregate(std::iter::empty::<&Document>());
        assert!(multiset.is_empty());
    }

    #[test]
    fn duplicate_mentions_produce_self_loop() {
        let documents = docs(&[&["X", "Y", "X"]]);
        let pairs: Vec<EdgeKey> = document_pairs(&documents[0]).collect();
        assert_eq!(
            pairs,
            vec![
                EdgeKey::new("X", "Y"),
                EdgeKey::new("X", "X"),
                EdgeKey::new("Y", "X"),
            ]
        );

        let multiset = aggregate(&documents);
        assert_eq!(multiset.count("X", "X"), 1);
        assert_eq!(multiset.count("X", "Y"), 2);
    }

    #[test]
    fn total_matches_binomial_sum() {
        let documents = docs(&[&["A", "B", "C"], &["A"], &["D", "E", "F", "G"], &[]]);
        let multiset = aggregate(&documents);
        assert_eq!(multiset.total(), pair_count(&documents));
        assert_eq!(multiset.total(), 3 + 6);
    }

    #[test]
    fn parallel_matches_sequential() {
        let documents = docs(&[
            &["A", "B", "C"],
            &["C", "B"],
            &["A", "A"],
            &["D"],
            &["E", "A", "B", "E"],
        ]);
        assert_eq!(aggregate_parallel(&documents), aggregate(&documents));
    }
}
