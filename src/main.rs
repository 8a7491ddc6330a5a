use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dependents::core::{ArtifactIdentity, BuildState};
use dependents::formatters::{JsonReportFormatter, TargetReport, TextTreeFormatter};
use dependents::model::snapshot::BuildSnapshot;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "dependents",
    version = "0.1.0",
    author = "dependents developers",
    about = "Reports which native binaries of a build depend on a given binary"
)]
struct Cli {
    /// Build snapshot: a JSON file, or a directory of per-module JSON documents
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Binary to report on, as an artifact key such as :app:main:debug.
    /// Repeatable; every native binary of the build when omitted
    #[arg(short, long, value_name = "KEY")]
    target: Vec<ArtifactIdentity>,

    /// Output format: text, json
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file path; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Ask for test-suite binaries too (currently has no effect)
    #[arg(long)]
    include_test_suites: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "dependents=debug" } else { "dependents=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input,
        target,
        format,
        output,
        include_test_suites,
        pretty,
        verbose: _,
    } = cli;

    let start_time = Instant::now();
    info!("Input: {}", input.display());
    info!("Format: {}", format.as_str());

    let model = BuildSnapshot::load(&input)?.into_model()?;
    let state = BuildState::build(&model)?;

    for cycle in state.index().cycles() {
        let members: Vec<&str> = cycle.iter().map(|key| key.as_str()).collect();
        warn!("Dependency cycle: {}", members.join(" -> "));
    }

    let targets: Vec<ArtifactIdentity> = if target.is_empty() {
        state
            .registry()
            .iter()
            .map(|(_, binary)| binary.id.clone())
            .collect()
    } else {
        target
    };

    let reports: Vec<TargetReport> = targets
        .into_iter()
        .map(|id| {
            let resolution = state.resolve_identity(&id, include_test_suites);
            TargetReport::new(id, resolution)
        })
        .collect();

    let rendered = match format {
        OutputFormat::Text => TextTreeFormatter::new().format_reports(&reports),
        OutputFormat::Json => JsonReportFormatter::new()
            .with_pretty(pretty)
            .format_reports(&reports)?,
    };

    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    info!(
        "Reported {} targets in {:.2}s",
        reports.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
