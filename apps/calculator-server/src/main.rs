mod config;
mod logging;
mod signals;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use api_gateway::ApiGateway;
use calculator::CalculatorModule;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Calculator API server
#[derive(Parser)]
#[command(name = "calculator-server")]
#[command(about = "Calculator API server - contract-validated arithmetic over REST")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and the API contract, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.apply_port_override(port)?;
    }

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    logging::init_logging(&config.logging, cli.verbose);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Calculator server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn build_gateway(config: &AppConfig) -> ApiGateway {
    ApiGateway::new(config.gateway.clone())
        .with_module(Arc::new(CalculatorModule::new(&config.calculator)))
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.bind_addr()?;
    let contract = build_gateway(config).load_contract()?;

    println!("Configuration is valid");
    println!(
        "API contract declares {} operations",
        contract.operations().count()
    );
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let gateway = build_gateway(&config);

    let cancel = CancellationToken::new();
    let watcher = signals::cancel_on_shutdown(cancel.clone());

    let served = gateway.serve(addr, cancel.clone()).await;
    cancel.cancel();
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "signal watcher did not finish cleanly");
    }

    served?;
    tracing::info!("Calculator server stopped");
    Ok(())
}
