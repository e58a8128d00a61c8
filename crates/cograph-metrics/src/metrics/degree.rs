//! Degree centrality: incident edges over the `n − 1` possible neighbours.

use std::collections::HashMap;

use crate::graph::build::CooccurrenceGraph;

/// Compute normalized degree centrality for every node.
///
/// A self-loop adds 2 to its node's degree, so over the whole graph
/// `Σ score = 2E / (n − 1)`. A single-node graph scores 0.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(g: &CooccurrenceGraph) -> HashMap<String, f64> {
    let n = g.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };

    g.node_names()
        .zip(g.degrees())
        .map(|(name, degree)| (name.to_string(), degree as f64 * scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cograph_core::edge::EdgeRecord;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> CooccurrenceGraph {
        CooccurrenceGraph::from_parts(
            nodes.iter().copied(),
            edges.iter().map(|(a, b)| EdgeRecord::new(*a, *b, 1)),
        )
    }

    #[test]
    fn degree_centrality_empty_graph() {
        assert!(degree_centrality(&graph(&[], &[])).is_empty());
    }

    #[test]
    fn degree_centrality_single_node() {
        let dc = degree_centrality(&graph(&["A"], &[]));
        assert!((dc["A"] - 0.0).abs() < f64::EPSILON);

        // A lone self-loop still has nobody else to connect to.
        let dc = degree_centrality(&graph(&[], &[("A", "A")]));
        assert!((dc["A"] - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degree_centrality_star_topology() {
        let dc = degree_centrality(&graph(&[], &[("H", "A"), ("H", "B"), ("H", "C")]));
        assert!((dc["H"] - 1.0).abs() < 1e-12);
        assert!((dc["A"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn self_loop_counts_twice() {
        let dc = degree_centrality(&graph(&[], &[("A", "A"), ("A", "B")]));
        assert!((dc["A"] - 3.0).abs() < 1e-12);
        assert!((dc["B"] - 1.0).abs() < 1e-12);
    }
}
