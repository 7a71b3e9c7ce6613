use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_cli::{config, AppConfig, Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sol_wallet=info,wallet_cli=info,sol_rpc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config::load_dotenv();

    // Only configuration problems abort the run.
    let config = AppConfig::from_env().context("failed to load configuration")?;
    let orchestrator =
        Orchestrator::from_config(config).context("failed to set up RPC transport")?;

    let report = orchestrator.run().await;
    for line in report.summary_lines() {
        println!("{line}");
    }

    Ok(())
}
