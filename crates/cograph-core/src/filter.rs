//! Edge filtering by minimum weight.
//!
//! Only pairs whose count is **strictly greater** than the threshold are
//! kept. The output is ordered by canonical key so repeated runs over the
//! same multiset produce byte-identical edgelists.
//!
//! [`filter_records`] is the entry point for edge rows that did not come
//! from [`crate::aggregate`] (e.g. a weighted edgelist loaded from disk).
//! Those rows are validated first: malformed input is rejected instead of
//! being silently folded into the result.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, instrument};

use crate::edge::{EdgeMultiset, EdgeRecord};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

/// Minimum edge weight; an edge survives when `weight > threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Threshold(u64);

impl Threshold {
    /// Validate a caller-supplied threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for negative values.
    pub fn new(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| Error::invalid(format!("threshold must be >= 0, got {value}")))
    }

    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether an edge of `weight` survives this threshold.
    #[must_use]
    pub const fn admits(self, weight: u64) -> bool {
        weight > self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// FilteredEdgeList
// ---------------------------------------------------------------------------

/// Edges that survived filtering, in canonical `(node_a, node_b)` order.
///
/// Every record has `node_a <= node_b`, a weight above the threshold that
/// produced it, and no two records share an unordered pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredEdgeList {
    records: Vec<EdgeRecord>,
}

impl FilteredEdgeList {
    #[must_use]
    pub fn records(&self) -> &[EdgeRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<EdgeRecord> {
        self.records
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EdgeRecord> {
        self.records.iter()
    }

    /// Sum of all retained weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.records.iter().map(|r| r.weight).sum()
    }

    fn from_unsorted(mut records: Vec<EdgeRecord>) -> Self {
        records.sort_unstable_by(|x, y| {
            (x.node_a.as_str(), x.node_b.as_str()).cmp(&(y.node_a.as_str(), y.node_b.as_str()))
        });
        Self { records }
    }
}

impl<'a> IntoIterator for &'a FilteredEdgeList {
    type Item = &'a EdgeRecord;
    type IntoIter = std::slice::Iter<'a, EdgeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep multiset entries whose count is strictly greater than `threshold`.
///
/// An empty result is a valid outcome, not an error.
#[must_use]
#[instrument(skip(multiset), fields(distinct_pairs = multiset.len()))]
pub fn filter_edges(multiset: &EdgeMultiset, threshold: Threshold) -> FilteredEdgeList {
    let records: Vec<EdgeRecord> = multiset
        .iter()
        .filter(|(_, count)| threshold.admits(*count))
        .map(|(key, count)| EdgeRecord::from((key.clone(), count)))
        .collect();

    debug!(kept = records.len(), "filtered edges");
    FilteredEdgeList::from_unsorted(records)
}

/// Validate externally supplied edge rows, then keep those above `threshold`.
///
/// Rows are canonicalized so that `node_a <= node_b`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when a row has an empty node name or a
/// zero weight, or when two rows describe the same unordered pair.
#[instrument(skip(records))]
pub fn filter_records<I>(records: I, threshold: Threshold) -> Result<FilteredEdgeList>
where
    I: IntoIterator<Item = EdgeRecord>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for (row, record) in records.into_iter().enumerate() {
        if record.node_a.is_empty() || record.node_b.is_empty() {
            return Err(Error::invalid(format!("edge row {row}: empty node name")));
        }
        if record.weight == 0 {
            return Err(Error::invalid(format!(
                "edge row {row}: weight must be a positive integer ({} -- {})",
                record.node_a, record.node_b
            )));
        }

        let key = record.key();
        if !seen.insert(key.clone()) {
            return Err(Error::invalid(format!(
                "edge row {row}: duplicate pair ({} -- {})",
                key.first(),
                key.second()
            )));
        }

        if threshold.admits(record.weight) {
            kept.push(EdgeRecord::from((key, record.weight)));
        }
    }

    debug!(kept = kept.len(), "filtered edge records");
    Ok(FilteredEdgeList::from_unsorted(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::document::Document;

    fn scenario_multiset() -> EdgeMultiset {
        let documents: Vec<Document> = vec![
            ["Alice", "Bob"].into_iter().collect(),
            ["Alice", "Bob", "Carol"].into_iter().collect(),
        ];
        aggregate(&documents)
    }

    #[test]
    fn threshold_rejects_negative() {
        let err = Threshold::new(-1).expect_err("negative threshold must fail");
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(Threshold::new(0).expect("zero is valid").get(), 0);
    }

    #[test]
    fn threshold_zero_keeps_everything() {
        let filtered = filter_edges(&scenario_multiset(), Threshold::from_u64(0));
        assert_eq!(
            filtered.records(),
            &[
                EdgeRecord::new("Alice", "Bob", 2),
                EdgeRecord::new("Alice", "Carol", 1),
                EdgeRecord::new("Bob", "Carol", 1),
            ]
        );
    }

    #[test]
    fn threshold_one_keeps_only_strictly_greater() {
        let filtered = filter_edges(&scenario_multiset(), Threshold::from_u64(1));
        assert_eq!(filtered.records(), &[EdgeRecord::new("Alice", "Bob", 2)]);
        assert_eq!(filtered.total_weight(), 2);
    }

    #[test]
    fn nothing_above_threshold_is_empty_not_error() {
        let filtered = filter_edges(&scenario_multiset(), Threshold::from_u64(500));
        assert!(filtered.is_empty());
    }

    #[test]
    fn refiltering_output_is_idempotent() {
        let threshold = Threshold::from_u64(1);
        let once = filter_edges(&scenario_multiset(), threshold);
        let twice = filter_records(once.clone().into_records(), threshold).expect("valid records");
        assert_eq!(once, twice);
    }

    #[test]
    fn records_are_canonicalized() {
        let rows = vec![EdgeRecord::new("Zed", "Amy", 3)];
        let filtered = filter_records(rows, Threshold::from_u64(0)).expect("valid");
        assert_eq!(filtered.records(), &[EdgeRecord::new("Amy", "Zed", 3)]);
    }

    #[test]
    fn malformed_records_fail_fast() {
        let zero = filter_records(vec![EdgeRecord::new("A", "B", 0)], Threshold::default());
        assert!(matches!(zero, Err(Error::InvalidArgument(_))));

        let empty = filter_records(vec![EdgeRecord::new("", "B", 2)], Threshold::default());
        assert!(matches!(empty, Err(Error::InvalidArgument(_))));

        let duplicate = filter_records(
            vec![
                EdgeRecord::new("Al", "Bo", 2),
                EdgeRecord::new("Bo", "Al", 5),
            ],
            Threshold::default(),
        );
        assert!(matches!(duplicate, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn self_loop_records_are_allowed() {
        let filtered = filter_records(vec![EdgeRecord::new("X", "X", 2)], Threshold::default())
            .expect("self-loops are data");
        assert_eq!(filtered.len(), 1);
    }
}
