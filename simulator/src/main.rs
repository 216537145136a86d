use anyhow::{Context, Result};
use clap::Parser;
use ephys_common::init_tracer;
use simulator::{config::Simulation, simulation::simulate};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{info, level_filters::LevelFilter};

// cargo run --bin simulator -- --config configs/simulation.json --output data/synthetic.json

#[derive(Clone, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON file describing the recording to generate.
    #[clap(long)]
    config: PathBuf,

    /// Recording file to write.
    #[clap(long)]
    output: PathBuf,

    /// Seed for the noise generators, overriding any seed in the config file.
    #[clap(long)]
    seed: Option<u64>,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _tracer = init_tracer!(cli.log_level)?;

    let simulation = Simulation::from_file(&cli.config)
        .with_context(|| format!("Loading {}", cli.config.display()))?;
    let seed = cli
        .seed
        .or(simulation.seed)
        .unwrap_or_else(rand::random::<u64>);
    info!("Using seed {seed}");

    let recording = simulate(&simulation, seed)?;

    let mut writer = BufWriter::new(
        File::create(&cli.output).with_context(|| format!("Creating {}", cli.output.display()))?,
    );
    serde_json::to_writer(&mut writer, &recording)?;
    writer.flush()?;
    info!("Wrote {}", cli.output.display());
    Ok(())
}
