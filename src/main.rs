use anyhow::Context;
use clap::Parser;
use fare_scout::{
    Args, NbpRateClient, Orchestrator, RunConfig, RyanairClient, TelegramClient,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fare_scout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration errors surface before any request is made
    let config = RunConfig::try_from(Args::parse())?;
    info!(?config, "starting fare scout");

    let fare_search =
        RyanairClient::new(config.client.clone()).context("building fare search client")?;
    let rate_source =
        NbpRateClient::new(config.client.clone()).context("building exchange rate client")?;
    let messenger = TelegramClient::new(config.client.clone(), &config.bot_token)
        .context("building messaging client")?;

    let today = chrono::Local::now().date_naive();
    let summary = Orchestrator::new(&config, &fare_search, &rate_source, &messenger)
        .run(today)
        .await?;

    info!(
        outbound = summary.outbound_fares,
        inbound = summary.return_fares,
        trips = summary.trips,
        "message sent successfully"
    );
    Ok(())
}
