//! Co-occurrence graph module.
//!
//! # Overview
//!
//! ```text
//! FilteredEdgeList
//!        ↓  build::CooccurrenceGraph::from_edges()
//! CooccurrenceGraph (UnGraph, self-loops kept, no parallel edges)
//!        ├─ stats::GraphStats::from_graph()
//!        └─ ego::ego_graph(largest_hub, radius)
//! ```
//!
//! ## Cache Invalidation
//!
//! [`CooccurrenceGraph::content_hash`] is a BLAKE3 hash of the sorted,
//! weighted edge set. Two graphs built from the same edges hash equal.

pub mod build;
pub mod ego;
pub mod stats;

pub use build::CooccurrenceGraph;
pub use ego::{ego_graph, largest_hub};
pub use stats::GraphStats;
