use anyhow::{Context, Result};
use clap::Parser;
use ephys_common::init_tracer;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, path::PathBuf};
use trace_analysis::{
    batch::{self, BatchOptions},
    loader, metrics,
    parameters::AnalysisConfig,
};
use tracing::{info, level_filters::LevelFilter, warn};

// cargo run --bin trace-analysis -- --config configs/train-eval.json --output-dir results "data/*.json"

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON file holding the analysis parameters.
    #[clap(long)]
    config: PathBuf,

    /// JSON array of onset times, in seconds, used instead of each recording's own onsets.
    #[clap(long)]
    onset_file: Option<PathBuf>,

    /// Directory into which reports are written.
    #[clap(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write time,value dumps of the original and blanked traces.
    #[clap(long)]
    save_traces: bool,

    /// Serve Prometheus metrics on this address.
    #[clap(long)]
    observability_address: Option<SocketAddr>,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,

    /// Recording files or glob patterns.
    #[clap(required = true)]
    inputs: Vec<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _tracer = init_tracer!(args.log_level)?;

    if let Some(address) = args.observability_address {
        PrometheusBuilder::new()
            .with_http_listener(address)
            .install()
            .context("Prometheus metrics exporter should be set up")?;
    }
    metrics::describe();

    let config = AnalysisConfig::from_file(&args.config)
        .with_context(|| format!("Loading {}", args.config.display()))?;
    let onset_override = args
        .onset_file
        .as_deref()
        .map(loader::load_onsets)
        .transpose()?;

    let options = BatchOptions {
        output_dir: args.output_dir,
        onset_override,
        save_traces: args.save_traces,
    };
    let inputs = batch::expand_inputs(&args.inputs)?;
    info!("Processing {} recordings", inputs.len());

    let outcomes = batch::run_batch(&inputs, &config, &options, None)?;
    let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();
    if failed > 0 {
        warn!("{failed} of {} recordings could not be processed", outcomes.len());
    }
    Ok(())
}
