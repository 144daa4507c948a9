use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use pricewatch::adapter::inbound::cli::command::Cli;
use pricewatch::adapter::inbound::cli::output::{self, OutputConfig};
use pricewatch::adapter::inbound::cli;
use pricewatch::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
    });

    if let Err(e) = run(cli).await {
        error!(error = %e, "Fatal error");
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "pricewatch starting");

    cli::execute(cli, config).await?;

    info!("pricewatch stopped");
    Ok(())
}
