//! Command-line driver for the Hillbillies unit simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "hb",
    about = "Hillbillies: a voxel world of busy little units",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log simulation internals (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn units on a terrain and run the tick loop
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "100")]
        ticks: u64,

        /// Time units per tick (must be below 0.2)
        #[arg(long, default_value = "0.1")]
        dt: f64,

        /// RNG seed for a reproducible run
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of units to spawn
        #[arg(short, long, default_value = "10")]
        units: usize,

        /// JSON terrain file (default: built-in demo terrain)
        #[arg(long)]
        terrain: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate a terrain file and summarize it
    Terrain {
        /// JSON terrain file (default: built-in demo terrain)
        #[arg(long)]
        terrain: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            ticks,
            dt,
            seed,
            units,
            terrain,
            format,
        } => commands::simulate::run(
            terrain.as_deref(),
            &commands::simulate::RunOptions {
                ticks,
                dt,
                seed,
                units,
                show_events: cli.verbose,
            },
            format,
        ),
        Commands::Terrain { terrain, format } => commands::terrain::run(terrain.as_deref(), format),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
