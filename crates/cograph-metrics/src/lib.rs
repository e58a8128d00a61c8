#![forbid(unsafe_code)]
//! cograph-metrics library.
//!
//! Builds an undirected co-occurrence graph from a filtered edgelist and
//! scores every node by degree, betweenness and eigenvector centrality.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`CentralityError`] for failures callers must surface.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod centrality;
pub mod error;
pub mod export;
pub mod graph;
pub mod metrics;

pub use centrality::{CentralityScores, CentralityTable};
pub use error::CentralityError;
pub use graph::{CooccurrenceGraph, GraphStats};
