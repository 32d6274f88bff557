//! taskdash CLI - task analytics dashboard.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use taskdash_client::{ClientConfig, HttpAnalyticsClient, DEFAULT_BASE_URL};
use taskdash_core::{derive_metrics, AggregateOutcome, SourceKind};
use taskdash_dashboard::{activate, render_dashboard, render_error, Aggregator, ViewState};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskdash")]
#[command(about = "Task analytics dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Analytics backend base URL
    #[arg(long, global = true, env = "TASKDASH_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = "TASKDASH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch analytics and print the dashboard
    Show {
        /// Print the outcome and metrics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print only the derived metrics
    Metrics,
    /// Print which analytics sources loaded
    Sources,
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins over the flag
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ClientConfig::new(cli.api_url);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    debug!("Using analytics backend at {}", config.base_url);

    let client = HttpAnalyticsClient::new(config).context("Failed to create analytics client")?;
    let aggregator = Aggregator::new(client);

    match cli.command {
        Commands::Show { json: true } => {
            let outcome = aggregator.aggregate().await;
            let failed = outcome.status.is_blocking();
            println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
            return Ok(exit_code(failed));
        }
        Commands::Show { json: false } => match activate(&aggregator).await {
            ViewState::Ready(dashboard) => {
                print!("{}", render_dashboard(&dashboard));
            }
            ViewState::Errored(message) => {
                print!("{}", render_error(&message));
                return Ok(ExitCode::FAILURE);
            }
            state => {
                // activate() always settles
                anyhow::bail!("Dashboard did not settle (state: {})", state.name());
            }
        },
        Commands::Metrics => {
            let outcome = aggregator.aggregate().await;
            let metrics = derive_metrics(&outcome);
            println!("Task Success Rate: {}%", metrics.success_rate);
            println!("Total Tasks: {}", metrics.total_tasks);
            if let Some(message) = outcome.message() {
                eprintln!("{}", message);
            }
            return Ok(exit_code(outcome.status.is_blocking()));
        }
        Commands::Sources => {
            let outcome = aggregator.aggregate().await;
            println!("Analytics sources ({})", outcome.status);
            for kind in SourceKind::ALL {
                match outcome.failures.iter().find(|f| f.kind == kind) {
                    Some(failure) => println!("  {}: failed: {}", kind, failure.cause),
                    None => println!("  {}: ok", kind),
                }
            }
            info!("Cycle {} settled at {}", outcome.cycle, outcome.settled_at);
            return Ok(exit_code(outcome.status.is_blocking()));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn outcome_json(outcome: &AggregateOutcome) -> serde_json::Value {
    json!({
        "status": outcome.status,
        "message": outcome.message(),
        "metrics": derive_metrics(outcome),
        "outcome": outcome,
    })
}
