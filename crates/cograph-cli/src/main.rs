#![forbid(unsafe_code)]

mod cmd;
mod output;
mod persist;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use cograph_core::config::{CONFIG_FILE_NAME, load_config};
use cograph_core::timing::{self, StageTimer};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "cograph",
    author,
    version,
    about = "cograph: entity co-occurrence graphs and centrality reports",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and FORMAT).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Pipeline config file (default: ./cograph.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Pipeline",
        about = "Build a weighted edgelist from a corpus",
        long_about = "Recognize entity mentions in every document, count co-occurring pairs \
                      and write the pairs above the threshold to weighted_edgelist.csv.",
        after_help = "EXAMPLES:\n    # Pair up PERSON mentions in a CSV corpus\n    cograph edgelist --input news.csv --gazetteer names.csv\n\n    # Every directory file, keep pairs seen more than 5 times\n    cograph edgelist -i corpus/ -g names.csv --threshold 5 -o out/\n\n    # Emit machine-readable output\n    cograph edgelist -i news.csv -g names.csv --json"
    )]
    Edgelist(cmd::edgelist::EdgelistArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "Score nodes of an edgelist graph",
        long_about = "Load a weighted edgelist, build the co-occurrence graph and write \
                      centrality_measures.csv, network.dot and ego_graph.dot.",
        after_help = "EXAMPLES:\n    # Analyze an edgelist written earlier\n    cograph analyze --edgelist out/weighted_edgelist.csv -o out/\n\n    # Drop light edges and widen the ego graph\n    cograph analyze -e out/weighted_edgelist.csv --min-weight 3 --ego-radius 2"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "Run edgelist and analyze in one go",
        long_about = "Build the edgelist and analyze it without re-reading the CSV.",
        after_help = "EXAMPLES:\n    # Full pipeline into out/\n    cograph run -i news.csv -g names.csv -o out/\n\n    # With stage timings on stderr\n    cograph --timing run -i news.csv -g names.csv --parallel"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Bash\n    cograph completions bash > ~/.local/share/bash-completion/completions/cograph\n\n    # Zsh\n    cograph completions zsh > ~/.zfunc/_cograph"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cograph=debug,info"
        } else {
            "cograph=info,warn"
        })
    });

    let format = env::var("COGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            let layer = fmt::layer().json().with_ansi(false);
            registry.with(layer.with_writer(std::io::stderr)).init();
        }
        _ => {
            let layer = fmt::layer().compact();
            registry.with(layer.with_writer(std::io::stderr)).init();
        }
    }
}

fn dispatch(cli: &Cli, output: OutputMode, timer: &mut StageTimer) -> anyhow::Result<()> {
    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        return cmd::completions::write_completions(args, &mut command, &mut io::stdout());
    }

    let config_path = cli.config_path();
    let config = load_config(&config_path)?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", config_path.display()))?;
    debug!(path = %config_path.display(), ?config, "config resolved");

    match cli.command {
        Commands::Edgelist(ref args) => cmd::edgelist::run_edgelist(args, &config, output, timer),
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, &config, output, timer),
        Commands::Run(ref args) => cmd::run::run_all(args, &config, output, timer),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let mut timer = StageTimer::new(cli.timing || timing::timing_enabled_from_env());

    let result = dispatch(&cli, output, &mut timer);

    if timer.is_enabled() {
        let report = timer.report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                eprintln!("timing report (json):");
                eprintln!("{json}");
            }
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_error = CliError::from(&err);
            if render_error(output, &cli_error).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
