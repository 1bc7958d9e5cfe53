//! ICN Navigator CLI
//!
//! Command-line interface over the company directory and the entitlement
//! engine.
//!
//! # Usage
//!
//! ```bash
//! icn --dataset data/icn.json companies list --state VIC --sort name
//! icn --dataset data/icn.json companies search "steel"
//! icn --dataset data/icn.json companies export --tier plus --search rail
//! icn entitlements show plus --format json
//! icn entitlements check free export_csv
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "icn")]
#[command(author = "ICN Navigator")]
#[command(version)]
#[command(about = "ICN Navigator Command Line Interface", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.icn-navigator/config.toml)
    #[arg(long, env = "ICN_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset file: JSON array of item records
    #[arg(long, env = "ICN_DATASET")]
    dataset: Option<PathBuf>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and query companies
    Companies {
        #[command(subcommand)]
        action: CompanyCommands,
    },
    /// Inspect tier entitlements
    Entitlements {
        #[command(subcommand)]
        action: EntitlementCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// Filter, sort and page companies
    List {
        /// Free-text search over name, address, sectors and capabilities
        #[arg(long, short)]
        search: Option<String>,
        /// Sector (repeatable)
        #[arg(long = "sector")]
        sectors: Vec<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long = "type")]
        company_type: Option<String>,
        /// all, verified or unverified
        #[arg(long)]
        verification: Option<String>,
        /// Ownership tag (repeatable)
        #[arg(long = "ownership")]
        ownership: Vec<String>,
        /// name, verified, distance or rating
        #[arg(long)]
        sort: Option<String>,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
        /// Origin for the distance sort, as LAT,LON
        #[arg(long)]
        near: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Company details
    Get { id: String },
    /// Quick search, capped
    Search { text: String },
    /// Directory-wide counts
    Stats,
    /// Values available to filter on
    Filters,
    /// Export matching companies as a member on the given tier
    Export {
        #[arg(long, default_value = "free")]
        tier: String,
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        state: Option<String>,
        /// Produce the report document instead of CSV
        #[arg(long)]
        pdf: bool,
        /// Write the export here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum EntitlementCommands {
    /// Features, limits and export fields for a tier
    Show { tier: String },
    /// Whether a tier grants a feature
    Check { tier: String, feature: String },
    /// Feature matrix across all tiers
    Matrix,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init,
}

fn init_tracing(level: Option<&str>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| level.map(str::to_string))
        .unwrap_or_else(|| "warn".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::Config::load(cli.config.as_deref(), cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    };
    init_tracing(config.log_level.as_deref());

    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(|f| f.parse().ok()))
        .unwrap_or(output::OutputFormat::Table);

    let result = match cli.command {
        Commands::Companies { action } => {
            commands::companies::handle(action, &config, cli.dataset.as_deref(), format).await
        }
        Commands::Entitlements { action } => commands::entitlements::handle(action, format),
        Commands::Config { action } => commands::config::handle(action, &config, cli.profile.as_deref(), format),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
