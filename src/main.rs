//! Bluesky → Discord Relay — Binary Entrypoint
//! Loads configuration, wires the live HTTP clients, and parks on the
//! watch loop until externally terminated.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bsky_webhook_relay::{
    BskyNotificationSource, BskySessionClient, DiscordNotifier, RelayConfig, Watcher,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Missing required variables end the process here, before the loop.
    let config = RelayConfig::from_env().context("startup configuration incomplete")?;

    tracing::info!(
        interval_min = config.interval_minutes(),
        "bluesky → discord relay starting"
    );

    let watcher = Watcher::new(
        config.identifier.clone(),
        config.app_password.clone(),
        Box::new(BskySessionClient::new()),
        Box::new(BskyNotificationSource::new()),
        Box::new(DiscordNotifier::new(config.webhook_url.clone())),
    );

    watcher.run(config.poll_interval).await;
    Ok(())
}
