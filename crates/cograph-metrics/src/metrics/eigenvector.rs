//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! An entity scores high when it co-occurs with other high-scoring
//! entities. The score vector is the dominant eigenvector of the
//! (unweighted) adjacency matrix.
//!
//! # Algorithm
//!
//! Power iteration on `A + I`:
//!
//! 1. Initialize every score to `1 / n`.
//! 2. `x(v) = x_last(v) + Σ x_last(u)` over neighbours `u` of `v`. A
//!    self-loop lists `v` as its own neighbour once.
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Stop when `Σ |x − x_last| < n · tolerance`.
//!
//! Adding the identity shifts every eigenvalue by one, which keeps
//! bipartite graphs (stars, paths) from oscillating without changing the
//! eigenvector. Running out of iterations is an error, not a silent zero
//! vector.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::error::CentralityError;
use crate::graph::build::CooccurrenceGraph;

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Eigenvector centrality scores: entity name → score.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Compute eigenvector centrality for every node.
///
/// A graph without edges scores 0.0 everywhere and performs no iterations.
///
/// # Errors
///
/// Returns [`CentralityError::InvalidSettings`] for `max_iter == 0` or a
/// tolerance that is not a positive number, and
/// [`CentralityError::NonConvergence`] when the scores have not settled
/// after `max_iter` iterations.
#[instrument(skip(g), fields(nodes = g.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(
    g: &CooccurrenceGraph,
    max_iter: usize,
    tolerance: f64,
) -> Result<EigenvectorResult, CentralityError> {
    if max_iter == 0 {
        return Err(CentralityError::InvalidSettings("max_iter must be > 0".into()));
    }
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(CentralityError::InvalidSettings(format!(
            "tolerance must be a positive number, got {tolerance}"
        )));
    }

    let n = g.node_count();

    if g.edge_count() == 0 {
        return Ok(EigenvectorResult {
            scores: g.node_names().map(|name| (name.to_string(), 0.0)).collect(),
            iterations: 0,
        });
    }

    let adjacency = g.adjacency();
    let mut scores: Vec<f64> = vec![1.0 / n as f64; n];

    for iter in 0..max_iter {
        let last = scores.clone();

        for (v, neighbours) in adjacency.iter().enumerate() {
            for &u in neighbours {
                scores[u] += last[v];
            }
        }

        // Normalize to unit L2 norm.
        let norm = scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut scores {
                *x /= norm;
            }
        }

        // Check convergence.
        let diff: f64 = scores
            .iter()
            .zip(&last)
            .map(|(a, b)| (a - b).abs())
            .sum();

        if diff < n as f64 * tolerance {
            debug!(iterations = iter + 1, "eigenvector centrality converged");
            return Ok(EigenvectorResult {
                scores: g.node_names().map(str::to_string).zip(scores).collect(),
                iterations: iter + 1,
            });
        }
    }

    Err(CentralityError::NonConvergence {
        node_count: n,
        max_iter,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
