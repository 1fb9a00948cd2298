use anyhow::Result;
use shortly::{config, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    telemetry::init(&config)?;

    tracing::info!(env = %config.app_env, "Starting URL shortener");
    config.print_summary();

    server::run(config).await
}
