use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docvec::Result;
use docvec::commands::{run_audit, serve, show_status};
use docvec::config::Config;

#[derive(Parser)]
#[command(name = "docvec")]
#[command(about = "A document vectorization, similarity search, and clustering service")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "docvec.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service
    Serve,
    /// Show store counts and embedding model readiness
    Status,
    /// Audit consistency between the document store and the vector index
    Audit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::Status => {
            show_status(config).await?;
        }
        Commands::Audit => {
            let consistent = run_audit(config).await?;
            if !consistent {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
