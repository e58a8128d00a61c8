//! Summary statistics for the co-occurrence graph.
//!
//! # Statistics Provided
//!
//! - `node_count` / `edge_count`: graph size; self-loops are edges.
//! - `self_loop_count`: `(A, A)` edges from repeated mentions.
//! - `density`: `2E / (n(n − 1))`, 0.0 for graphs with fewer than 2 nodes.
//!   Self-loops count toward `E`, so density can exceed 1.0 on tiny graphs.
//! - `component_count`: connected components, isolated nodes included.
//! - `total_weight`: sum of co-occurrence counts over all edges.
//! - `max_degree`: highest node degree, self-loops counting twice.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::build::CooccurrenceGraph;

/// Summary statistics for a co-occurrence graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loop_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub total_weight: u64,
    pub max_degree: usize,
}

impl GraphStats {
    /// Compute statistics from a [`CooccurrenceGraph`].
    #[must_use]
    pub fn from_graph(g: &CooccurrenceGraph) -> Self {
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        #[allow(clippy::cast_precision_loss)]
        let density = if node_count < 2 {
            0.0
        } else {
            let n = node_count as f64;
            (2.0 * edge_count as f64) / (n * (n - 1.0))
        };

        let component_count = if node_count == 0 {
            0
        } else {
            connected_components(&g.graph)
        };

        Self {
            node_count,
            edge_count,
            self_loop_count: g.self_loop_count(),
            density,
            component_count,
            total_weight: g.total_weight(),
            max_degree: g.degrees().into_iter().max().unwrap_or(0),
        }
    }
}
