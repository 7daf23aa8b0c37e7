//! Ratingset CLI binary.
//!
//! Builds the credit rating classification dataset and inspects its inputs.

mod cmd;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ratingset_pipeline::config::{DEFAULT_OUTPUT_PATH, DEFAULT_RATINGS_PATH, DEFAULT_STOCKS_PATH};
use ratingset_pipeline::{FetchPolicy, PipelineConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "ratingset=info";

#[derive(Parser)]
#[command(name = "ratingset")]
#[command(about = "Credit rating dataset builder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input files shared by the subcommands that read them.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Ratings history CSV
    #[arg(long, default_value = DEFAULT_RATINGS_PATH)]
    ratings: PathBuf,

    /// Stock registry CSV
    #[arg(long, default_value = DEFAULT_STOCKS_PATH)]
    stocks: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dataset and write it as CSV
    Build {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output CSV (overwritten)
        #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Stop at the first symbol whose ratios cannot be fetched
        #[arg(long)]
        fail_fast: bool,

        /// Financial Modeling Prep API key (otherwise read from `.env`)
        #[arg(long, env = "FMP_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Filter and merge the inputs without fetching ratios
    Preview {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Show the canonical join key for company names
    Clean {
        /// Company names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn pipeline_config(
    inputs: InputArgs,
    output: Option<PathBuf>,
    fail_fast: bool,
) -> PipelineConfig {
    let defaults = PipelineConfig::default();
    PipelineConfig {
        ratings_path: inputs.ratings,
        stocks_path: inputs.stocks,
        output_path: output.unwrap_or(defaults.output_path),
        fetch_policy: if fail_fast {
            FetchPolicy::Abort
        } else {
            FetchPolicy::Skip
        },
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Commands::Build {
            inputs,
            output,
            fail_fast,
            api_key,
        } => {
            let config = pipeline_config(inputs, Some(output), fail_fast);
            cmd::build::build_dataset(config, api_key).await?;
        }
        Commands::Preview { inputs } => {
            let config = pipeline_config(inputs, None, false);
            cmd::preview::preview_inputs(&config)?;
        }
        Commands::Clean { names } => {
            cmd::clean::show_clean_names(&names);
        }
    }

    Ok(())
}
