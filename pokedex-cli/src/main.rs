//! Pokedex - terminal catalog viewer for the PokeAPI
//!
//! Lists, searches and inspects catalog entries through the pokedex-core
//! aggregator. Output goes to stdout; logs always go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use pokedex_core::{CatalogAggregator, CatalogConfig, CatalogGateway};

mod browse;
mod catalog_cli;
mod state;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "pokedex",
    about = "Browse the PokeAPI catalog from the terminal",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Config file (defaults to the user config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[clap(long, global = true)]
    api_url: Option<String>,

    /// Serve responses from a JSON fixture file instead of the network
    #[clap(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog entries
    List {
        /// Number of pages to load (at least 1)
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Search entries by name, falling back to a direct lookup
    Search {
        /// Name or part of a name
        query: String,

        /// Number of pages to load before searching (at least 1)
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show details and the evolution chain of one entry
    Show {
        /// Name, id or detail URL
        target: String,

        /// Show shiny artwork
        #[clap(long)]
        shiny: bool,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List entries grouped by generation
    Generations {
        /// Only this generation
        #[clap(long)]
        generation: Option<u8>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show the single entry behind a detail URL
    Select {
        /// Detail URL
        url: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    Browse,
}

fn initialize_tracing(log_level: &LogLevel, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = CatalogConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env();
            config
        }
        None => CatalogConfig::load().context("Failed to load config")?,
    };
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level, cli.log_json);

    let config = load_config(&cli)?;
    let gateway: Arc<dyn CatalogGateway> =
        catalog_cli::open_gateway(&config, cli.fixtures.as_deref())?;
    tracing::debug!("Using {} gateway at {}", gateway.name(), gateway.base_url());

    match cli.command {
        Command::List { pages, json } => {
            let mut aggregator = CatalogAggregator::new(gateway, config);
            catalog_cli::execute_list(&mut aggregator, pages, json).await
        }
        Command::Search { query, pages, json } => {
            let mut aggregator = CatalogAggregator::new(gateway, config);
            catalog_cli::execute_search(&mut aggregator, &query, pages, json).await
        }
        Command::Show {
            target,
            shiny,
            json,
        } => catalog_cli::execute_show(gateway.as_ref(), &config, &target, shiny, json).await,
        Command::Generations { generation, json } => {
            catalog_cli::execute_generations(gateway.as_ref(), &config, generation, json).await
        }
        Command::Select { url, json } => {
            let mut aggregator = CatalogAggregator::new(gateway, config);
            catalog_cli::execute_select(&mut aggregator, &url, json).await
        }
        Command::Browse => {
            let aggregator = CatalogAggregator::new(gateway, config);
            browse::BrowseSession::new(aggregator)
                .run(BufReader::new(tokio::io::stdin()))
                .await
        }
    }
}
