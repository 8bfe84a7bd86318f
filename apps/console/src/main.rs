use std::sync::Arc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod prompt;

use availability_cell::{HttpSchedulingApi, SchedulingApi};
use shared_config::AppConfig;

use crate::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env();
    if !config.is_configured() {
        error!("SCHEDULING_API_URL and SCHEDULING_API_KEY must be set");
        std::process::exit(1);
    }

    info!("Using scheduling service at {}", config.scheduling_api_url);
    let api: Arc<dyn SchedulingApi> = Arc::new(HttpSchedulingApi::new(&config)?);

    commands::run(cli.command, api, &config).await
}
