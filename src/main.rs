use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildsim::advisor::Advisor;
use buildsim::api::{AppState, run_http_server};
use buildsim::config::{Cli, Command, ServeArgs, SimulateArgs};
use buildsim::core::run_pipeline;
use buildsim::store::Store;

const DEFAULT_LOG_FILTER: &str = "buildsim=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Simulate(args) => simulate(&args),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let advisor = Advisor::new(args.advisor_config()).context("failed to build HTTP client")?;
    if advisor.config().force_fallback {
        tracing::warn!("fallback forced; AI providers will not be called");
    }

    let store = if args.in_memory {
        Store::in_memory()
    } else {
        Store::open(&args.data_file)
            .await
            .with_context(|| format!("failed to open {}", args.data_file.display()))?
    };

    let addr = args.bind_addr();
    run_http_server(addr, AppState::new(advisor, store))
        .await
        .with_context(|| format!("server error on {addr}"))
}

fn simulate(args: &SimulateArgs) -> anyhow::Result<()> {
    let result = run_pipeline(
        &args.baseline(),
        &args.founder_controls(),
        &args.stress_controls(),
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
