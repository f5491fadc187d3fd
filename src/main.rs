/// Flowline: dependency-graph workflow orchestration engine
///
/// Command-line entry point. Discovers the built-in workflows and either
/// lists them or runs a selection until interrupted, on sensor polling or
/// on cron schedules.

use anyhow::Result;
use clap::{Parser, Subcommand};
use flowline::{Application, Config};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowline")]
#[command(about = "Dependency-graph workflow orchestration", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run workflows until interrupted
    Run {
        /// Workflow to run; repeat for more than one. All workflows when omitted.
        #[arg(long = "workflow-name")]
        workflow_name: Vec<String>,
        /// Cron schedule with seconds, e.g. "0 */5 * * * *". Give one to share
        /// across all workflows or one per workflow. Sensor polling when omitted.
        #[arg(long = "on-schedule")]
        on_schedule: Vec<String>,
    },
    /// List available workflows
    Ls,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = Application::discover(Config::default())?;

    match cli.command {
        Commands::Run {
            workflow_name,
            on_schedule,
        } => {
            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, stopping workflow loops");
                    interrupt.cancel();
                }
            });

            let outcome = app.start(&workflow_name, &on_schedule, cancel).await;
            app.shutdown().await;
            outcome?;
        }
        Commands::Ls => {
            for name in app.registry().names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}
