use std::io::Write;

use anyhow::Result;
use clap::Args;
use cograph_core::PipelineConfig;
use cograph_core::timing::StageTimer;
use serde::Serialize;

use super::analyze::{self, AnalyzeSummary, analyze_edges};
use super::edgelist::{self, EdgelistArgs, EdgelistSummary, build_edgelist};
use crate::output::{OutputMode, render_mode};

/// Arguments for `cograph run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub edgelist: EdgelistArgs,

    /// Hops around the largest hub included in the ego graph.
    #[arg(long, default_value_t = 1)]
    pub ego_radius: usize,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub edgelist: EdgelistSummary,
    pub analysis: AnalyzeSummary,
}

/// Execute `cograph run`: edgelist and analysis in one process.
///
/// The analysis reads the in-memory edge list, not the CSV just written.
pub fn run_all(
    args: &RunArgs,
    config: &PipelineConfig,
    output: OutputMode,
    timer: &mut StageTimer,
) -> Result<()> {
    let (edgelist, edges) = build_edgelist(&args.edgelist, config, timer)?;
    let analysis = analyze_edges(
        &edges,
        &args.edgelist.output,
        args.ego_radius,
        &config.eigenvector,
        timer,
        &edgelist.file,
    )?;

    let summary = RunSummary { edgelist, analysis };
    render_mode(output, &summary, render_text, render_pretty)
}

fn render_text(s: &RunSummary, w: &mut dyn Write) -> std::io::Result<()> {
    edgelist::render_text(&s.edgelist, w)?;
    analyze::render_text(&s.analysis, w)
}

fn render_pretty(s: &RunSummary, w: &mut dyn Write) -> std::io::Result<()> {
    edgelist::render_pretty(&s.edgelist, w)?;
    writeln!(w)?;
    analyze::render_pretty(&s.analysis, w)
}
