//! Spectra command-line entry point

use clap::{Parser, Subcommand};
use spectra::{http, Coordinator, RouterConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Spectra - specialist query routing and report synthesis")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Listen address, overriding `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Process one query and print the report
    Ask {
        /// Query text
        query: String,
    },
    /// List the registered specialists
    Specialists,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spectra=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = RouterConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
                config.validate()?;
            }
            let coordinator = Arc::new(Coordinator::from_config(&config)?);
            http::serve(coordinator, &config).await?;
        }
        Command::Ask { query } => {
            let coordinator = Coordinator::from_config(&config)?;
            let response = coordinator.process(&query).await?;
            println!("{}", response.document);
        }
        Command::Specialists => {
            let registry = config.registry()?;
            for profile in registry.profiles() {
                println!("{:<18} {}", profile.tag.as_str(), profile.name);
            }
        }
    }

    Ok(())
}
