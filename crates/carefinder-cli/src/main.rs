use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod results;
mod suggest;
mod terminal_map;

#[derive(Debug, Parser)]
#[command(name = "carefinder")]
#[command(about = "Filter provider results by distance and resolve addresses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter a results payload around a center and print the ranked list
    Results {
        /// JSON navigation payload (`results`, optional `searchLocation` and `insurance`)
        #[arg(long)]
        file: PathBuf,
        /// Move the search center to this address before filtering
        #[arg(long)]
        address: Option<String>,
        /// Search radius in miles (1-50)
        #[arg(long)]
        radius: Option<u32>,
        /// Insurance provider name from the catalog
        #[arg(long)]
        provider: Option<String>,
        /// Plan offered by the chosen provider
        #[arg(long, requires = "provider")]
        plan: Option<String>,
        /// Pan the map to this entry of the ranked list (0-based)
        #[arg(long)]
        select: Option<usize>,
    },
    /// Print street-level address suggestions for a partial address
    Suggest {
        /// Partial address, e.g. "123 Main St Austin"
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = carefinder_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Results {
            file,
            address,
            radius,
            provider,
            plan,
            select,
        } => {
            results::run_results(
                &config,
                results::ResultsArgs {
                    file,
                    address,
                    radius,
                    provider,
                    plan,
                    select,
                },
            )
            .await
        }
        Commands::Suggest { query } => suggest::run_suggest(&config, &query).await,
    }
}
