use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cograph_core::config::EigenvectorConfig;
use cograph_core::ingest::load_edgelist;
use cograph_core::timing::StageTimer;
use cograph_core::{FilteredEdgeList, PipelineConfig, Threshold, filter_records};
use cograph_metrics::export::to_dot;
use cograph_metrics::graph::{ego_graph, largest_hub};
use cograph_metrics::{CentralityScores, CentralityTable, CooccurrenceGraph, GraphStats};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::persist::{self, EGO_DOT_FILE, NETWORK_DOT_FILE};

/// Rows shown in the summary; the CSV always holds every node.
const TOP_ROWS: usize = 10;

/// Arguments for `cograph analyze`.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Edgelist CSV with a `nodeA,nodeB,weight` header.
    #[arg(long, short = 'e', value_name = "CSV")]
    pub edgelist: PathBuf,

    /// Keep only edges heavier than this (default: keep all).
    #[arg(long, allow_negative_numbers = true)]
    pub min_weight: Option<i64>,

    /// Directory for result files (created if missing).
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,

    /// Hops around the largest hub included in the ego graph.
    #[arg(long, default_value_t = 1)]
    pub ego_radius: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeSummary {
    pub edgelist: String,
    pub content_hash: String,
    pub stats: GraphStats,
    pub hub: Option<String>,
    pub ego_nodes: usize,
    pub eigenvector_iterations: usize,
    pub top: Vec<CentralityScores>,
    pub files: Vec<String>,
}

/// Build the graph from `edges`, score it and write every result file.
pub fn analyze_edges(
    edges: &FilteredEdgeList,
    out_dir: &Path,
    ego_radius: usize,
    eigen: &EigenvectorConfig,
    timer: &mut StageTimer,
    source: &str,
) -> Result<AnalyzeSummary> {
    let graph = timer.timed("graph", || CooccurrenceGraph::from_edges(edges));
    let stats = GraphStats::from_graph(&graph);
    info!(
        nodes = stats.node_count,
        edges = stats.edge_count,
        components = stats.component_count,
        "graph built"
    );

    let table = timer
        .timed("centrality", || CentralityTable::compute(&graph, eigen.max_iter, eigen.tolerance))
        .context("Failed to compute centrality")?;

    let hub = largest_hub(&graph);
    let ego = hub
        .as_deref()
        .and_then(|center| ego_graph(&graph, center, ego_radius))
        .unwrap_or_else(|| CooccurrenceGraph::from_edges(&FilteredEdgeList::default()));
    if hub.is_none() {
        warn!("graph is empty; wrote an empty ego graph");
    }

    let files = timer.timed("write.analysis", || -> Result<Vec<PathBuf>> {
        Ok(vec![
            persist::write_centrality(out_dir, &table)?,
            persist::write_dot(out_dir, NETWORK_DOT_FILE, &to_dot(&graph))?,
            persist::write_dot(out_dir, EGO_DOT_FILE, &to_dot(&ego))?,
        ])
    })?;
    info!(dir = %out_dir.display(), rows = table.len(), "analysis written");

    let eigenvector_iterations = table.eigenvector_iterations();
    let top = table.into_rows().into_iter().take(TOP_ROWS).collect();

    Ok(AnalyzeSummary {
        edgelist: source.to_string(),
        content_hash: graph.content_hash.clone(),
        stats,
        hub,
        ego_nodes: ego.node_count(),
        eigenvector_iterations,
        top,
        files: files.iter().map(|p| p.display().to_string()).collect(),
    })
}

/// Execute `cograph analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &PipelineConfig,
    output: OutputMode,
    timer: &mut StageTimer,
) -> Result<()> {
    let threshold = Threshold::new(args.min_weight.unwrap_or(0)).context("Invalid --min-weight")?;

    let records = timer
        .timed("load.edgelist", || load_edgelist(&args.edgelist))
        .with_context(|| format!("Failed to load edgelist {}", args.edgelist.display()))?;
    let edges = filter_records(records, threshold)
        .with_context(|| format!("Malformed edgelist {}", args.edgelist.display()))?;

    let summary = analyze_edges(
        &edges,
        &args.output,
        args.ego_radius,
        &config.eigenvector,
        timer,
        &args.edgelist.display().to_string(),
    )?;
    render_mode(output, &summary, render_text, render_pretty)
}

pub fn render_text(s: &AnalyzeSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "nodes={} edges={} components={} hub={} iterations={}",
        s.stats.node_count,
        s.stats.edge_count,
        s.stats.component_count,
        s.hub.as_deref().unwrap_or("-"),
        s.eigenvector_iterations
    )?;
    for row in &s.top {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{:.6}",
            row.node, row.degree, row.betweenness, row.eigenvector
        )?;
    }
    Ok(())
}

pub fn render_pretty(s: &AnalyzeSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Graph")?;
    pretty_kv(w, "Edgelist", &s.edgelist)?;
    pretty_kv(w, "Nodes", s.stats.node_count.to_string())?;
    let (edges, loops) = (s.stats.edge_count, s.stats.self_loop_count);
    pretty_kv(w, "Edges", format!("{edges} ({loops} self-loops)"))?;
    pretty_kv(w, "Components", s.stats.component_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", s.stats.density))?;
    pretty_kv(w, "Hub", s.hub.as_deref().unwrap_or("(none)"))?;
    pretty_kv(w, "Ego nodes", s.ego_nodes.to_string())?;
    pretty_kv(w, "Hash", &s.content_hash)?;
    writeln!(w)?;

    pretty_section(w, "Top nodes")?;
    if s.top.is_empty() {
        writeln!(w, "(no nodes)")?;
    } else {
        writeln!(
            w,
            "{:<24} {:>10} {:>12} {:>12}",
            "node", "degree", "betweenness", "eigenvector"
        )?;
        for row in &s.top {
            writeln!(
                w,
                "{:<24} {:>10.4} {:>12.4} {:>12.4}",
                row.node, row.degree, row.betweenness, row.eigenvector
            )?;
        }
    }
    pretty_rule(w)?;
    for file in &s.files {
        writeln!(w, "wrote {file}")?;
    }
    Ok(())
}
