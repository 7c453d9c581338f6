//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `indicator_console` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::process;

use indicator_console::app::print_report;
use indicator_console::config::{Cli, Command, LookupArgs};
use indicator_console::initialization::init_logger_with;
use indicator_console::{
    classify_indicator, run_history, run_lookup, Config, LookupRequest, SourceRef,
};

/// Builds the lookup request, detecting the kind when none was given.
fn lookup_request(args: &LookupArgs) -> Result<LookupRequest> {
    let kind = match args.kind {
        Some(kind) => kind,
        None => classify_indicator(&args.indicator).ok_or_else(|| {
            anyhow!(
                "Could not detect the kind of '{}'; pass --kind",
                args.indicator
            )
        })?,
    };
    let sources = args
        .sources
        .iter()
        .map(|id| SourceRef::new(id.clone(), id.clone()))
        .collect();
    Ok(LookupRequest::new(args.indicator.trim(), kind, sources))
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from(&cli.global);
    let output = config.output;

    match cli.command {
        Command::Lookup(args) => {
            let request = lookup_request(&args)?;
            let title = format!("{} ({})", request.data, request.kind);
            let report = run_lookup(config, request).await?;
            print_report(
                output,
                &title,
                report.request_id(),
                &report.classification(),
            )
            .context("Failed to render summary")?;
        }
        Command::History(args) => {
            let report = run_history(config, &args.request_id).await?;
            let title = format!(
                "{} ({}) at {}",
                report.history.data,
                report.history.kind,
                report.history.created_at.to_rfc3339()
            );
            print_report(
                output,
                &title,
                Some(&report.history.id),
                &report.classification(),
            )
            .context("Failed to render summary")?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try the current directory first, then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    let log_level = cli.global.log_level.clone();
    let log_format = cli.global.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        eprintln!("indicator_console error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
