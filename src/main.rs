use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// recipebox - recipe sharing and shopping lists
#[derive(Parser)]
#[command(name = "recipebox")]
#[command(about = "Recipe sharing backend with aggregated shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Load ingredients and tags from JSON files
    Import {
        /// JSON array of {"name", "measurement_unit"} objects
        #[arg(long)]
        ingredients: Option<PathBuf>,

        /// JSON array of {"name", "slug", "color"} objects
        #[arg(long)]
        tags: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = recipebox::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    recipebox::observability::init_observability(
        "recipebox",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => recipebox::cli::serve(config, host, port).await,
        Commands::Migrate => recipebox::cli::migrate(config).await,
        Commands::Reset => recipebox::cli::reset(config).await,
        Commands::Import { ingredients, tags } => {
            recipebox::cli::import(config, ingredients, tags).await
        }
    }
}
