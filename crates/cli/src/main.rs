//! devsweep - stale device auditor for a device-management fleet
//!
//! Fetches the whole inventory, writes reports, and moves devices that have
//! been silent too long through recycle bin and permanent delete.

mod config;
mod logging;
mod output;
mod token;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use config::AppConfig;
use devsweep_core::application::{SweepMode, SweepService};
use devsweep_core::config::PartialInventoryPolicy;
use devsweep_core::port::{SystemTimeProvider, TokioSleeper};
use devsweep_infra_http::HttpDeviceService;
use devsweep_infra_report::FileReportSink;
use token::{EnvTokenProvider, PromptTokenProvider};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "devsweep")]
#[command(about = "Find and remove stale devices from a device-management fleet", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, env = "DEVSWEEP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the staleness threshold in days
    #[arg(long)]
    stale_days: Option<u32>,

    /// Override the report output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and classify only; write reports, remove nothing
    Scan,

    /// Recycle stale devices, then permanently delete them
    Sweep {
        /// Stop after the recycle-bin move
        #[arg(long)]
        recycle_only: bool,

        /// Act even if the inventory fetch stopped early
        #[arg(long)]
        allow_partial: bool,

        /// Never prompt for the verification code
        #[arg(long)]
        no_prompt: bool,
    },

    /// Permanently delete specific devices (e.g. recycled by an earlier run)
    Purge {
        /// Comma-separated device IDs
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        /// Never prompt for the verification code
        #[arg(long)]
        no_prompt: bool,
    },
}

/// Only removal commands may ask the operator for the verification code
fn prompt_allowed(command: &Commands) -> bool {
    match command {
        Commands::Sweep { no_prompt, .. } | Commands::Purge { no_prompt, .. } => !no_prompt,
        Commands::Scan => false,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut app_config = AppConfig::load(cli.config.as_deref())?;
    if let Some(days) = cli.stale_days {
        app_config.sweep.stale_days = days;
    }
    if let Some(dir) = cli.output_dir.clone() {
        app_config.report.output_dir = dir;
    }
    if let Commands::Sweep {
        allow_partial: true,
        ..
    } = cli.command
    {
        app_config.sweep.partial_inventory = PartialInventoryPolicy::Proceed;
    }
    app_config.validate()?;

    // 2. Initialize logging
    let _log_guard = logging::init(&app_config.logging)?;
    info!("devsweep v{} starting...", VERSION);

    // 3. Setup dependencies (DI wiring)
    let device_service = Arc::new(
        HttpDeviceService::new(&app_config.service).context("HTTP client setup failed")?,
    );
    let report_sink = Arc::new(
        FileReportSink::new(&app_config.report).context("Report directory setup failed")?,
    );
    let token_provider = token::verification_chain(
        app_config.verification_code.as_deref(),
        EnvTokenProvider::default(),
        prompt_allowed(&cli.command).then(PromptTokenProvider::stdin),
    );

    let sweep = SweepService::new(
        &app_config.sweep,
        device_service,
        report_sink,
        Arc::new(token_provider),
        Arc::new(SystemTimeProvider),
        Arc::new(TokioSleeper),
    );

    // 4. Run
    match cli.command {
        Commands::Scan | Commands::Sweep { .. } => {
            let mode = match cli.command {
                Commands::Sweep {
                    recycle_only: true, ..
                } => SweepMode::RecycleOnly,
                Commands::Sweep { .. } => SweepMode::Full,
                _ => SweepMode::Scan,
            };

            let summary = match sweep.run(mode).await {
                Ok(summary) => summary,
                Err(e) => {
                    error!(error = %e, "Sweep failed");
                    return Err(e).context("Sweep failed");
                }
            };
            output::print_summary(&summary, app_config.sweep.stale_days);
        }

        Commands::Purge { ids, .. } => {
            println!("{}", "Permanently deleting requested devices".cyan().bold());
            let outcome = sweep.purge(ids).await;
            output::print_outcome("Force delete:", &outcome);
        }
    }

    info!("Run complete");
    Ok(())
}
