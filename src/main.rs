use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use simsummary::analysis;
use simsummary::config_loader::{self, CliOverrides};
use simsummary::orchestrator;

/// Per-node PDR and delay summaries with confidence intervals
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing one subdirectory of result files per topology
    data_dir: PathBuf,

    /// Number of iterations per routing protocol
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Topology to summarize (repeatable, default: sim-3)
    #[arg(short, long = "topology")]
    topologies: Vec<String>,

    /// Routing protocol to summarize (repeatable, default: UNICAST)
    #[arg(short, long = "protocol")]
    protocols: Vec<String>,

    /// Confidence level of the reported intervals (default: 0.95)
    #[arg(long)]
    confidence: Option<f64>,

    /// Append a running mean for every row instead of one mean per node and file
    #[arg(long)]
    legacy_cumulative: bool,

    /// Output directory for the results_<topology>-.csv files (default: .)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional YAML run configuration; command-line values take precedence.
    ///
    /// The data directory and iteration count always come from the positional
    /// arguments, so `data_dir` and `iterations` keys in the file are ignored here.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write a JSON report to this path
    #[arg(long)]
    json_report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            data_dir: Some(self.data_dir.clone()),
            output_dir: self.output.clone(),
            iterations: Some(self.iterations),
            topologies: self.topologies.clone(),
            protocols: self.protocols.clone(),
            confidence: self.confidence,
            legacy_cumulative: self.legacy_cumulative,
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    info!("Data directory: {:?}", args.data_dir);
    info!("Iterations: {}", args.iterations);

    let config = config_loader::resolve_config(args.config.as_deref(), &args.overrides())?;

    let report = orchestrator::run_summary(&config)?;

    if let Some(path) = &args.json_report {
        analysis::generate_json_report(&report, path)?;
    }

    analysis::report::print_summary(&report);

    info!("Summary completed successfully");
    Ok(())
}
