//! Centrality metrics for the co-occurrence graph.
//!
//! # Overview
//!
//! Each metric answers a different question about an entity:
//!
//! - **Degree centrality** (`degree`): with how many others does it co-occur?
//! - **Betweenness centrality** (`betweenness`): does it bridge otherwise
//!   distant groups?
//! - **Eigenvector centrality** (`eigenvector`): does it co-occur with other
//!   central entities?
//!
//! All metrics are unweighted: an edge counts the same whatever its
//! co-occurrence count. Scores are keyed by entity name.
//!
//! ```rust,ignore
//! use cograph_metrics::graph::CooccurrenceGraph;
//! use cograph_metrics::metrics::{betweenness, degree, eigenvector};
//!
//! let g = CooccurrenceGraph::from_edges(&filtered);
//! let dc = degree::degree_centrality(&g);
//! let bc = betweenness::betweenness_centrality(&g);
//! let ev = eigenvector::eigenvector_centrality(&g, 100, 1e-6)?;
//! ```

pub mod betweenness;
pub mod degree;
pub mod eigenvector;
