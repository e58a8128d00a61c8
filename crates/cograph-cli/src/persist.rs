//! Result files written by the CLI.
//!
//! All writers create the output directory first. Empty inputs still
//! produce a file with the header row (or an empty DOT graph).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cograph_core::FilteredEdgeList;
use cograph_metrics::CentralityTable;
use tracing::debug;

pub const EDGELIST_FILE: &str = "weighted_edgelist.csv";
pub const CENTRALITY_FILE: &str = "centrality_measures.csv";
pub const NETWORK_DOT_FILE: &str = "network.dot";
pub const EGO_DOT_FILE: &str = "ego_graph.dot";

const EDGELIST_HEADER: [&str; 3] = ["nodeA", "nodeB", "weight"];
const CENTRALITY_HEADER: [&str; 4] = ["node", "degree", "betweenness", "eigenvector"];

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

/// Write `nodeA,nodeB,weight` rows to `<dir>/weighted_edgelist.csv`.
pub fn write_edgelist(dir: &Path, edges: &FilteredEdgeList) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(EDGELIST_FILE);

    let mut writer = csv_writer(&path)?;
    writer.write_record(EDGELIST_HEADER)?;
    for record in edges {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), rows = edges.len(), "wrote edgelist");
    Ok(path)
}

/// Write one row per node to `<dir>/centrality_measures.csv`, in table order.
pub fn write_centrality(dir: &Path, table: &CentralityTable) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(CENTRALITY_FILE);

    let mut writer = csv_writer(&path)?;
    writer.write_record(CENTRALITY_HEADER)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), rows = table.len(), "wrote centrality table");
    Ok(path)
}

/// Write a DOT document to `<dir>/<name>`.
pub fn write_dot(dir: &Path, name: &str, dot: &str) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(name);
    fs::write(&path, dot).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))
}
