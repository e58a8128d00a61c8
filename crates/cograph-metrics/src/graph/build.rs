//! Graph construction from a filtered edgelist.
//!
//! # Overview
//!
//! Every node referenced by an edge becomes a graph node; every edge keeps
//! its co-occurrence count as the edge weight. Nodes are inserted in sorted
//! name order so node indices (and therefore every metric vector) are
//! deterministic for a given edge set.
//!
//! ## Self-loops
//!
//! A name mentioned twice in one document produces an `(A, A)` edge. Such
//! self-loops are kept. [`CooccurrenceGraph::degrees`] counts them twice
//! and [`CooccurrenceGraph::adjacency`] lists the node once as its own
//! neighbour.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use cograph_core::edge::{EdgeKey, EdgeRecord};
use cograph_core::filter::FilteredEdgeList;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// CooccurrenceGraph
// ---------------------------------------------------------------------------

/// Undirected weighted graph of entity co-occurrences.
#[derive(Debug, Clone)]
pub struct CooccurrenceGraph {
    /// Undirected graph: nodes = entity names, edge weight = pair count.
    pub graph: UnGraph<String, u64>,
    /// Mapping from entity name to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the weighted edge set.
    pub content_hash: String,
}

impl CooccurrenceGraph {
    /// Build a graph from a filtered edgelist.
    #[must_use]
    #[instrument(skip(edges), fields(edges = edges.len()))]
    pub fn from_edges(edges: &FilteredEdgeList) -> Self {
        Self::from_parts(std::iter::empty::<String>(), edges.iter().cloned())
    }

    /// Build a graph from explicit nodes plus edges.
    ///
    /// Nodes named only by `nodes` are kept as isolated nodes. Edge
    /// endpoints are added as nodes automatically. A repeated unordered
    /// pair keeps its first weight.
    #[must_use]
    pub fn from_parts<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        let edges: Vec<EdgeRecord> = edges.into_iter().collect();

        let mut names: BTreeSet<String> = nodes.into_iter().map(Into::into).collect();
        for edge in &edges {
            names.insert(edge.node_a.clone());
            names.insert(edge.node_b.clone());
        }

        let mut graph = UnGraph::<String, u64>::with_capacity(names.len(), edges.len());
        let mut node_map = HashMap::with_capacity(names.len());
        for name in names {
            let idx = graph.add_node(name.clone());
            node_map.insert(name, idx);
        }

        let mut canonical: Vec<(String, String, u64)> = Vec::with_capacity(edges.len());
        for edge in edges {
            let weight = edge.weight;
            let (a, b) = edge.key().into_parts();
            let (Some(&ia), Some(&ib)) = (node_map.get(&a), node_map.get(&b)) else {
                continue;
            };
            // Avoid parallel edges (petgraph allows them by default).
            if graph.find_edge(ia, ib).is_none() {
                graph.add_edge(ia, ib, weight);
                canonical.push((a, b, weight));
            }
        }

        canonical.sort();
        let content_hash = compute_edge_hash(&canonical);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            hash = %content_hash,
            "built co-occurrence graph"
        );

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Return the number of nodes (entities) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges, self-loops included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for an entity name.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Entity names in node-index order (sorted).
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges as records, in canonical `(node_a, node_b)` order.
    #[must_use]
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        let mut records: Vec<EdgeRecord> = self
            .graph
            .edge_references()
            .map(|e| {
                let a = &self.graph[e.source()];
                let b = &self.graph[e.target()];
                EdgeRecord::from((EdgeKey::new(a.as_str(), b.as_str()), *e.weight()))
            })
            .collect();
        records.sort_by(|x, y| (&x.node_a, &x.node_b).cmp(&(&y.node_a, &y.node_b)));
        records
    }

    /// Number of `(A, A)` edges.
    #[must_use]
    pub fn self_loop_count(&self) -> usize {
        self.graph
            .edge_references()
            .filter(|e| e.source() == e.target())
            .count()
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.graph.edge_references().map(|e| *e.weight()).sum()
    }

    /// Degree per node index; a self-loop adds 2.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count()];
        for e in self.graph.edge_references() {
            degrees[e.source().index()] += 1;
            degrees[e.target().index()] += 1;
        }
        degrees
    }

    /// Neighbour lists per node index; a self-loop lists the node once.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];
        for e in self.graph.edge_references() {
            let (a, b) = (e.source().index(), e.target().index());
            adjacency[a].push(b);
            if a != b {
                adjacency[b].push(a);
            }
        }
        adjacency
    }
}

/// Compute a BLAKE3 hash of the sorted edge list for cache invalidation.
fn compute_edge_hash(edges: &[(String, String, u64)]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (a, b, weight) in edges {
        hasher.update(a.as_bytes());
        hasher.update(b"\x00");
        hasher.update(b.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&weight.to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cograph_core::filter::{Threshold, filter_records};

    fn list(edges: &[(&str, &str, u64)]) -> FilteredEdgeList {
        filter_records(
            edges.iter().map(|(a, b, w)| EdgeRecord::new(*a, *b, *w)),
            Threshold::default(),
        )
        .expect("valid edges")
    }

    #[test]
    fn empty_list_produces_empty_graph() {
        let graph = CooccurrenceGraph::from_edges(&FilteredEdgeList::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        // Hash of empty edge set is stable.
        assert!(graph.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn nodes_are_sorted_and_weights_kept() {
        let edges = list(&[("Carol", "Alice", 4), ("Bob", "Alice", 2)]);
        let graph = CooccurrenceGraph::from_edges(&edges);
        let names: Vec<&str> = graph.node_names().collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.total_weight(), 6);

        let alice = graph.node_index("Alice").expect("alice");
        let carol = graph.node_index("Carol").expect("carol");
        let edge = graph.graph.find_edge(alice, carol).expect("edge");
        assert_eq!(graph.graph[edge], 4);
    }

    #[test]
    fn self_loop_is_kept_and_counted_twice() {
        let edges = list(&[("Alice", "Alice", 1), ("Alice", "Bob", 3)]);
        let graph = CooccurrenceGraph::from_edges(&edges);
        assert_eq!(graph.self_loop_count(), 1);
        assert_eq!(graph.degrees(), vec![3, 1]);
        assert_eq!(graph.adjacency(), vec![vec![0, 1], vec![0]]);
    }

    #[test]
    fn hash_depends_on_edges_not_insertion_order() {
        let a = CooccurrenceGraph::from_edges(&list(&[("A", "B", 1), ("B", "C", 2)]));
        let b = CooccurrenceGraph::from_parts(
            ["C"],
            vec![EdgeRecord::new("C", "B", 2), EdgeRecord::new("B", "A", 1)],
        );
        assert_eq!(a.content_hash, b.content_hash);

        let c = CooccurrenceGraph::from_edges(&list(&[("A", "B", 1), ("B", "C", 3)]));
        assert_ne!(a.content_hash, c.content_hash);
    }

    #[test]
    fn isolated_nodes_from_parts() {
        let graph = CooccurrenceGraph::from_parts(["Zed"], vec![EdgeRecord::new("A", "B", 1)]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.degrees(), vec![1, 1, 0]);
    }

    #[test]
    fn edge_records_round_trip_canonically() {
        let graph = CooccurrenceGraph::from_edges(&list(&[("B", "A", 5), ("C", "C", 1)]));
        assert_eq!(
            graph.edge_records(),
            vec![EdgeRecord::new("A", "B", 5), EdgeRecord::new("C", "C", 1)]
        );
    }
}
