mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use std::path::PathBuf;

use commands::{cmd_check, cmd_inspect, cmd_query, cmd_validate};

#[derive(Parser)]
#[command(name = "sxgeo")]
#[command(
    about = "IPv4 to country lookups over SxGeo databases",
    long_about = "sxgeo - Resolve IPv4 addresses to country codes using a Sypex Geo (SxGeo.dat) database\n\n\
    The database is memory-mapped and searched in place; nothing is converted or cached.\n\n\
    Examples:\n\
      sxgeo query SxGeo.dat 188.163.89.66 8.8.8.8\n\
      sxgeo inspect SxGeo.dat --json\n\
      sxgeo validate SxGeo.dat --level strict\n\
      sxgeo check SxGeo.dat fixtures.json"
)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the country of one or more IPv4 addresses
    Query {
        /// Path to the SxGeo database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Dotted-quad IPv4 addresses
        #[arg(value_name = "IP", required = true)]
        ips: Vec<String>,

        /// Quiet mode - no output, only exit code (0 = all resolved, 1 = otherwise)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show header fields and section layout of a database
    Inspect {
        /// Path to the SxGeo database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Validate a database file for structural consistency
    Validate {
        /// Path to the SxGeo database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Validation level: standard or strict (default)
        #[arg(short, long, default_value = "strict")]
        level: String,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Compare lookups against a JSON fixture file of expected countries
    Check {
        /// Path to the SxGeo database
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// JSON array of {"ip": "...", "country": "XX"} objects
        #[arg(value_name = "FIXTURES")]
        fixtures: PathBuf,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Query {
            database,
            ips,
            quiet,
        } => cmd_query(database, ips, quiet),
        Commands::Inspect { database, json } => cmd_inspect(database, json),
        Commands::Validate {
            database,
            level,
            json,
        } => cmd_validate(database, level, json),
        Commands::Check {
            database,
            fixtures,
            json,
        } => cmd_check(database, fixtures, json),
    }
}
