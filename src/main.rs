//! hddt-sync main entry point
//!
//! This is the command-line interface for the e-invoice registry sync job.

use clap::Parser;
use hddt_sync::config::{load_config_with_hash, Config};
use hddt_sync::sync::{run_sync, RunOptions, SyncOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status of a run that stopped before reaching the records
const EXIT_ABORTED: u8 = 2;

/// hddt-sync: keeps a local copy of the e-invoice organization registry
///
/// Fetches the registry page, and when its "last updated" month differs from
/// the last run, merges its table into the local JSON store. Meant to be run
/// by an external scheduler.
#[derive(Parser, Debug)]
#[command(name = "hddt-sync")]
#[command(version = "1.0.0")]
#[command(about = "Sync the e-invoice organization registry", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Merge even if the source date has not changed
    #[arg(long)]
    force: bool,

    /// Fetch and merge in memory, report, write nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions {
        force: cli.force,
        dry_run: cli.dry_run,
    };

    match run_sync(&config, options).await {
        Ok(outcome) => report(&outcome),
        Err(e) => {
            tracing::error!("Sync failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("hddt_sync=info,warn"),
                1 => EnvFilter::new("hddt_sync=debug,info"),
                2 => EnvFilter::new("hddt_sync=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, then applies environment overrides
fn load_configuration(path: Option<&std::path::Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    config.apply_env();
    hddt_sync::config::validate(&config)?;

    Ok(config)
}

/// Logs the final outcome and maps it to an exit status
fn report(outcome: &SyncOutcome) -> ExitCode {
    match outcome {
        SyncOutcome::Synced {
            source_date,
            stats,
            total_records,
        } => {
            tracing::info!(
                "Synced to {}: {} ({} records stored)",
                source_date,
                stats,
                total_records
            );
            if !stats.has_changes() {
                tracing::info!("Source date moved but no record changed");
            }
            ExitCode::SUCCESS
        }
        SyncOutcome::UpToDate { source_date } => {
            tracing::info!("Already at {}", source_date);
            ExitCode::SUCCESS
        }
        SyncOutcome::NoRecords { source_date, table } => {
            tracing::warn!("No records extracted for {} (table: {:?})", source_date, table);
            ExitCode::SUCCESS
        }
        SyncOutcome::DryRun {
            source_date,
            stats,
            total_records,
        } => {
            println!("Source date: {}", source_date);
            println!("{}", stats);
            println!("Records after merge: {}", total_records);
            ExitCode::SUCCESS
        }
        SyncOutcome::Aborted(reason) => {
            tracing::warn!("Run aborted: {:?}", reason);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}
