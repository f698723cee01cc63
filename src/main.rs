//! Binary entry point for ankistat.
//!
//! This binary provides the CLI and the MCP stdio server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use ankistat::config::{AnkiStatConfig, LoadedConfig};
use ankistat::mcp::{McpServer, ToolRegistry};
use ankistat::observability::{self, ObservabilityConfig};
use ankistat::services::{CollectionStatsRequest, DeckStatsRequest, ReviewHistoryRequest};
use ankistat::stats::{Boundaries, DAYS_SUFFIX};
use ankistat::{AnkiConnectClient, StatsService};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// ankistat - study statistics for an Anki collection, over CLI or MCP.
#[derive(Parser)]
#[command(name = "ankistat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Bucket boundary options shared by the distribution commands.
#[derive(Args)]
struct BucketArgs {
    /// Ease boundaries, comma-separated and ascending.
    #[arg(long, value_name = "LIST")]
    ease_buckets: Option<String>,

    /// Interval boundaries in days, comma-separated and ascending.
    #[arg(long, value_name = "LIST")]
    interval_buckets: Option<String>,
}

impl BucketArgs {
    fn ease(&self) -> ankistat::Result<Boundaries> {
        self.ease_buckets
            .as_deref()
            .map_or_else(|| Ok(Boundaries::default_ease()), Boundaries::parse_list)
    }

    fn intervals(&self) -> ankistat::Result<Boundaries> {
        self.interval_buckets.as_deref().map_or_else(
            || Ok(Boundaries::default_interval()),
            |list| Boundaries::parse_list(list).map(|b| b.with_unit(DAYS_SUFFIX)),
        )
    }
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio.
    Serve,

    /// Counts and distributions for one deck.
    DeckStats {
        /// Full deck name.
        deck: String,

        #[command(flatten)]
        buckets: BucketArgs,
    },

    /// Counts and distributions across every deck.
    CollectionStats {
        #[command(flatten)]
        buckets: BucketArgs,
    },

    /// Daily reviews, retention and streak for a deck.
    ReviewHistory {
        /// Full deck name.
        deck: String,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD (default: today, UTC).
        #[arg(long)]
        end: Option<String>,
    },

    /// List deck names.
    Decks,

    /// Show configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let LoadedConfig { config, warnings } = match AnkiStatConfig::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }

    let observability_config = match ObservabilityConfig::from_config(&config, cli.verbose) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };
    if let Err(e) = observability::init(observability_config) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: AnkiStatConfig) -> ankistat::Result<()> {
    let client = AnkiConnectClient::from_config(&config.anki);

    match cli.command {
        Commands::Serve => cmd_serve(client),

        Commands::DeckStats { deck, buckets } => {
            let request = DeckStatsRequest::new(deck)
                .with_ease_boundaries(buckets.ease()?)
                .with_interval_boundaries(buckets.intervals()?);
            print_json(&StatsService::new(client).deck_stats(&request)?)
        },

        Commands::CollectionStats { buckets } => {
            let request = CollectionStatsRequest {
                ease_boundaries: buckets.ease()?,
                interval_boundaries: buckets.intervals()?,
            };
            print_json(&StatsService::new(client).collection_stats(&request)?)
        },

        Commands::ReviewHistory { deck, start, end } => {
            let request = ReviewHistoryRequest::parse(deck, &start, end.as_deref())?;
            print_json(&StatsService::new(client).review_history(&request)?)
        },

        Commands::Decks => print_json(&StatsService::new(client).list_decks()?),

        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Serve command.
fn cmd_serve(client: AnkiConnectClient) -> ankistat::Result<()> {
    let endpoint = client.endpoint().to_string();
    let server = McpServer::new(ToolRegistry::new(Box::new(client), endpoint));
    server.run_stdio()
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    config_file: Option<String>,
    config: &'a AnkiStatConfig,
}

/// Config command.
fn cmd_config(config: &AnkiStatConfig, show: bool) -> ankistat::Result<()> {
    if !show {
        println!("Use --show to display configuration");
        return Ok(());
    }
    print_json(&ConfigReport {
        config_file: AnkiStatConfig::default_path().map(|p| p.display().to_string()),
        config,
    })
}

fn print_json<T: Serialize>(value: &T) -> ankistat::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| ankistat::Error::OperationFailed {
        operation: "serialize_output".to_string(),
        cause: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}
