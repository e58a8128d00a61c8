//! Per-node centrality table: degree, betweenness and eigenvector merged
//! into one deterministically ordered result.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::CentralityError;
use crate::graph::build::CooccurrenceGraph;
use crate::metrics::betweenness::betweenness_centrality;
use crate::metrics::degree::degree_centrality;
use crate::metrics::eigenvector::eigenvector_centrality;

/// Centrality scores of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityScores {
    pub node: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
}

impl CentralityScores {
    /// Table order: degree, betweenness, eigenvector (all descending), then
    /// node name ascending.
    #[must_use]
    pub fn ranking(&self, other: &Self) -> Ordering {
        other
            .degree
            .total_cmp(&self.degree)
            .then_with(|| other.betweenness.total_cmp(&self.betweenness))
            .then_with(|| other.eigenvector.total_cmp(&self.eigenvector))
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Centrality scores for every node, sorted by [`CentralityScores::ranking`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentralityTable {
    rows: Vec<CentralityScores>,
    eigenvector_iterations: usize,
}

impl CentralityTable {
    /// Compute all three centralities for `g`.
    ///
    /// # Errors
    ///
    /// Returns [`CentralityError::NonConvergence`] if eigenvector power
    /// iteration does not converge within `max_iter`.
    #[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
    pub fn compute(
        g: &CooccurrenceGraph,
        max_iter: usize,
        tolerance: f64,
    ) -> Result<Self, CentralityError> {
        let degree = degree_centrality(g);
        let betweenness = betweenness_centrality(g);
        let eigenvector = eigenvector_centrality(g, max_iter, tolerance)?;

        let mut table = Self::from_scores(&degree, &betweenness, &eigenvector.scores);
        table.eigenvector_iterations = eigenvector.iterations;

        info!(
            nodes = table.len(),
            eigenvector_iterations = table.eigenvector_iterations,
            "computed centrality"
        );
        Ok(table)
    }

    /// Merge per-metric maps into sorted rows.
    ///
    /// The node set is the union of the three maps; a node missing from a
    /// map scores 0.0 for that metric.
    #[must_use]
    pub fn from_scores(
        degree: &HashMap<String, f64>,
        betweenness: &HashMap<String, f64>,
        eigenvector: &HashMap<String, f64>,
    ) -> Self {
        let mut nodes: Vec<&String> = degree
            .keys()
            .chain(betweenness.keys())
            .chain(eigenvector.keys())
            .collect();
        nodes.sort_unstable();
        nodes.dedup();

        let score = |map: &HashMap<String, f64>, node: &str| map.get(node).copied().unwrap_or(0.0);

        let mut rows: Vec<CentralityScores> = nodes
            .into_iter()
            .map(|node| CentralityScores {
                node: node.clone(),
                degree: score(degree, node.as_str()),
                betweenness: score(betweenness, node.as_str()),
                eigenvector: score(eigenvector, node.as_str()),
            })
            .collect();
        rows.sort_by(CentralityScores::ranking);

        Self {
            rows,
            eigenvector_iterations: 0,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[CentralityScores] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<CentralityScores> {
        self.rows
    }

    /// Scores for one node by name.
    #[must_use]
    pub fn get(&self, node: &str) -> Option<&CentralityScores> {
        self.rows.iter().find(|row| row.node == node)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Power iterations the eigenvector step needed.
    #[must_use]
    pub const fn eigenvector_iterations(&self) -> usize {
        self.eigenvector_iterations
    }
}
