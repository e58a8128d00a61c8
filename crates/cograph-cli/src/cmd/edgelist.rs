use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cograph_core::ingest::load_documents;
use cograph_core::timing::StageTimer;
use cograph_core::{FilteredEdgeList, Gazetteer, Pipeline, PipelineConfig};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::persist;

/// Arguments for `cograph edgelist`.
#[derive(Args, Debug, Clone)]
pub struct EdgelistArgs {
    /// Input `.csv` / `.txt` file, or a directory of them.
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: PathBuf,

    /// Gazetteer CSV with a `text,label` header.
    #[arg(long, short = 'g', value_name = "CSV")]
    pub gazetteer: PathBuf,

    /// CSV column holding the document text.
    #[arg(long)]
    pub column: Option<String>,

    /// Entity category to pair up (e.g. PERSON, ORG).
    #[arg(long)]
    pub label: Option<String>,

    /// Keep pairs co-occurring strictly more often than this.
    #[arg(long, short = 't', allow_negative_numbers = true)]
    pub threshold: Option<i64>,

    /// Directory for result files (created if missing).
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,

    /// Aggregate documents on all cores.
    #[arg(long)]
    pub parallel: bool,
}

impl EdgelistArgs {
    /// Apply flag values on top of the file config.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(ref column) = self.column {
            config.text_column.clone_from(column);
        }
        if let Some(ref label) = self.label {
            config.entity_label.clone_from(label);
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if self.parallel {
            config.parallel = true;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EdgelistSummary {
    pub input: String,
    pub label: String,
    pub threshold: u64,
    pub documents: usize,
    pub skipped: usize,
    pub mentions: usize,
    pub distinct_pairs: usize,
    pub pair_instances: u64,
    pub edges: usize,
    pub file: String,
}

/// Ingest, recognize, aggregate and filter; write the edgelist CSV.
pub fn build_edgelist(
    args: &EdgelistArgs,
    config: &PipelineConfig,
    timer: &mut StageTimer,
) -> Result<(EdgelistSummary, FilteredEdgeList)> {
    let mut config = config.clone();
    args.apply(&mut config);

    let gazetteer = Gazetteer::from_path(&args.gazetteer)
        .with_context(|| format!("Failed to load gazetteer {}", args.gazetteer.display()))?;
    let pipeline = Pipeline::new(config, gazetteer).context("Invalid pipeline settings")?;
    check_label_known(&args.gazetteer, &pipeline);

    let settings = pipeline.config();
    let raw = timer
        .timed("ingest", || load_documents(&args.input, &settings.text_column, &settings.sample))
        .with_context(|| format!("Failed to load documents from {}", args.input.display()))?;

    let output = timer.timed("pipeline", || pipeline.run(&raw))?;

    let file = timer.timed("write.edgelist", || {
        persist::write_edgelist(&args.output, &output.edges)
    })?;
    if output.edges.is_empty() {
        warn!(
            threshold = %pipeline.threshold(),
            "no pair co-occurs often enough; wrote an empty edgelist"
        );
    }
    info!(path = %file.display(), edges = output.edges.len(), "edgelist written");

    let summary = EdgelistSummary {
        input: args.input.display().to_string(),
        label: pipeline.label().to_string(),
        threshold: pipeline.threshold().get(),
        documents: output.documents,
        skipped: output.skipped,
        mentions: output.mentions,
        distinct_pairs: output.multiset.len(),
        pair_instances: output.multiset.total(),
        edges: output.edges.len(),
        file: file.display().to_string(),
    };
    Ok((summary, output.edges))
}

fn check_label_known(path: &Path, pipeline: &Pipeline<Gazetteer>) {
    let label = pipeline.label();
    if !pipeline.recognizer().labels().any(|known| known == label) {
        warn!(
            gazetteer = %path.display(),
            label = %label,
            "gazetteer has no entries for this label; every document will be empty"
        );
    }
}

/// Execute `cograph edgelist`.
pub fn run_edgelist(
    args: &EdgelistArgs,
    config: &PipelineConfig,
    output: OutputMode,
    timer: &mut StageTimer,
) -> Result<()> {
    let (summary, _) = build_edgelist(args, config, timer)?;
    render_mode(output, &summary, render_text, render_pretty)
}

pub fn render_text(s: &EdgelistSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "documents={} skipped={} mentions={} pairs={} edges={} file={}",
        s.documents, s.skipped, s.mentions, s.distinct_pairs, s.edges, s.file
    )
}

pub fn render_pretty(s: &EdgelistSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Edgelist")?;
    pretty_kv(w, "Input", &s.input)?;
    pretty_kv(w, "Label", &s.label)?;
    pretty_kv(w, "Threshold", format!("> {}", s.threshold))?;
    pretty_kv(
        w,
        "Documents",
        format!("{} ({} skipped)", s.documents, s.skipped),
    )?;
    pretty_kv(w, "Mentions", s.mentions.to_string())?;
    pretty_kv(
        w,
        "Pairs",
        format!("{} distinct, {} total", s.distinct_pairs, s.pair_instances),
    )?;
    pretty_kv(w, "Edges kept", s.edges.to_string())?;
    pretty_kv(w, "Written", &s.file)
}
