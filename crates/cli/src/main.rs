//! Azure unused-resource advisor CLI
//!
//! Inventories a subscription's virtual machines, managed disks, and
//! HDInsight clusters, correlates them with trailing telemetry, and reports
//! the resources that look idle or orphaned.

mod commands;
mod config;
mod output;

use std::sync::Arc;

use advisor_lib::client::ArmClient;
use advisor_lib::error::STATUS_UNKNOWN;
use advisor_lib::{Advisor, AdvisorError};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Advisor for unused Azure resources
#[derive(Parser)]
#[command(name = "azure-advisor")]
#[command(author, version, about = "Advisor for unused Azure resources", long_about = None)]
pub struct Cli {
    /// Subscription to scan (can also be set via AZURE_SUBSCRIPTION_ID)
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Maximum concurrent backend queries
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Trailing metric window in hours
    #[arg(long)]
    pub window_hours: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report VMs in use and their monthly CPU mean
    Vm,

    /// Report unattached disks and the disks of unused VMs
    Disk,

    /// Report HDInsight clusters with no gateway traffic
    Cluster,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        output::print_error(&format!("{err:#}"));
        std::process::exit(exit_status(&err));
    }
}

/// Exit status per the library's mapping; anything that is not an advisor
/// error counts as an unknown failure.
fn exit_status(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AdvisorError>()
        .map(AdvisorError::exit_status)
        .unwrap_or(STATUS_UNKNOWN)
}

async fn run(cli: Cli) -> Result<()> {
    let settings = config::CliConfig::load()?;
    let advisor_config = settings.advisor_config(&cli)?;

    let client = Arc::new(ArmClient::from_env()?);
    let advisor = Advisor::new(client.clone(), client, advisor_config);

    match cli.command {
        Commands::Vm => commands::vm::run(&advisor, cli.format).await,
        Commands::Disk => commands::disk::run(&advisor, cli.format).await,
        Commands::Cluster => commands::cluster::run(&advisor, cli.format).await,
    }
}
