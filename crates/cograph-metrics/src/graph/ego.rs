//! Ego-network extraction around the best-connected entity.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::graph::build::CooccurrenceGraph;

/// Name of the node with the highest degree; ties go to the smallest name.
///
/// Returns `None` for an empty graph.
#[must_use]
pub fn largest_hub(g: &CooccurrenceGraph) -> Option<String> {
    let degrees = g.degrees();
    // Node indices follow sorted name order, so the first max wins ties.
    let mut best: Option<(usize, usize)> = None;
    for (idx, &degree) in degrees.iter().enumerate() {
        if best.is_none_or(|(_, d)| degree > d) {
            best = Some((idx, degree));
        }
    }
    best.and_then(|(idx, _)| g.graph.node_weights().nth(idx).cloned())
}

/// Induced subgraph of every node within `radius` hops of `center`.
///
/// Returns `None` when `center` is not in the graph. Radius 0 yields the
/// center alone (plus its self-loop, if any).
#[must_use]
pub fn ego_graph(g: &CooccurrenceGraph, center: &str, radius: usize) -> Option<CooccurrenceGraph> {
    let start = g.node_index(center)?.index();
    let adjacency = g.adjacency();

    let mut dist: Vec<Option<usize>> = vec![None; g.node_count()];
    dist[start] = Some(0);
    let mut queue = VecDeque::from([start]);

    while let Some(v) = queue.pop_front() {
        let Some(dv) = dist[v] else { continue };
        if dv == radius {
            continue;
        }
        for &w in &adjacency[v] {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
        }
    }

    let names: Vec<&str> = g.node_names().collect();
    let members: BTreeSet<&str> = dist
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_some())
        .map(|(idx, _)| names[idx])
        .collect();

    let edges = g
        .edge_records()
        .into_iter()
        .filter(|e| members.contains(e.node_a.as_str()) && members.contains(e.node_b.as_str()));

    let ego = CooccurrenceGraph::from_parts(members.iter().copied(), edges);
    debug!(
        center,
        radius,
        nodes = ego.node_count(),
        edges = ego.edge_count(),
        "extracted ego graph"
    );
    Some(ego)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cograph_core::edge::EdgeRecord;

    fn graph(edges: &[(&str, &str)]) -> CooccurrenceGraph {
        CooccurrenceGraph::from_parts(
            std::iter::empty::<String>(),
            edges.iter().map(|(a, b)| EdgeRecord::new(*a, *b, 1)),
        )
    }

    #[test]
    fn hub_is_highest_degree() {
        let g = graph(&[("A", "B"), ("C", "B"), ("D", "B"), ("A", "D")]);
        assert_eq!(largest_hub(&g).as_deref(), Some("B"));
    }

    #[test]
    fn hub_ties_break_by_name() {
        let g = graph(&[("Y", "Z"), ("X", "W")]);
        assert_eq!(largest_hub(&g).as_deref(), Some("W"));
        assert_eq!(largest_hub(&graph(&[])), None);
    }

    #[test]
    fn radius_one_keeps_neighbours_and_induced_edges() {
        // A - B - C - D, plus B - E and A - E
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D"), ("B", "E"), ("A", "E")]);
        let ego = ego_graph(&g, "B", 1).expect("center present");
        let names: Vec<&str> = ego.node_names().collect();
        assert_eq!(names, vec!["A", "B", "C", "E"]);
        // A-E is induced even though neither endpoint is the center.
        assert_eq!(ego.edge_count(), 4);
    }

    #[test]
    fn radius_two_reaches_further() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let ego = ego_graph(&g, "A", 2).expect("center present");
        assert_eq!(ego.node_names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn radius_zero_is_center_only() {
        let g = graph(&[("A", "A"), ("A", "B")]);
        let ego = ego_graph(&g, "A", 0).expect("center present");
        assert_eq!(ego.node_count(), 1);
        assert_eq!(ego.self_loop_count(), 1);
    }

    #[test]
    fn unknown_center_is_none() {
        assert!(ego_graph(&graph(&[("A", "B")]), "Q", 1).is_none());
    }
}
