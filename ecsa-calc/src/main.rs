use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ecsa_calc::{commands, config};

#[derive(Parser)]
#[command(name = "ecsa-calc")]
#[command(about = "Engineering fee calculator for the ECSA fee guideline", long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.ecsa-calc/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Guideline dataset file (TOML or JSON), overriding the config
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate fees for a request file
    Calculate {
        /// Request file (TOML)
        request: PathBuf,

        /// Print the result as JSON instead of a text report
        #[arg(long)]
        json: bool,

        /// Write inputs.csv, calculations.csv, stages.csv and result.json
        /// to this directory (default: export.directory from the config)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Calculate even if the request is incomplete
        #[arg(long)]
        force: bool,
    },

    /// Show fee tables, adjustment factors and stage weights
    Tables {
        /// Only show this table id
        #[arg(long)]
        table: Option<String>,
    },

    /// Validate the configured guideline dataset
    CheckDataset,

    /// Write a default config file
    Init {
        /// Also write an example request file to this path
        #[arg(long)]
        request: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    // Execute command
    match cli.command {
        Commands::Init { request, force } => {
            commands::init::run(&config_path, request.as_deref(), force)
        }
        Commands::Calculate {
            request,
            json,
            export,
            force,
        } => {
            let options = commands::calculate::Options {
                json,
                export,
                force,
            };
            commands::calculate::run(&config_path, cli.dataset.as_deref(), &request, options)
        }
        Commands::Tables { table } => {
            commands::tables::run(&config_path, cli.dataset.as_deref(), table.as_deref())
        }
        Commands::CheckDataset => {
            commands::check_dataset::run(&config_path, cli.dataset.as_deref())
        }
    }
}
