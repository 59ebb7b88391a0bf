use myenergi_bridge::config::{Config, HEARTBEAT_PERIOD};
use myenergi_bridge::{Endpoint, HubClient, PollEngine, PollScheduler, TracingSink};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!("Starting myenergi hub bridge");

    let endpoint = match &config.base_url {
        Some(url) => Endpoint::new(url.clone()),
        None => Endpoint::default(),
    };
    let client = HubClient::new(config.credentials.clone());
    let scheduler = PollScheduler::new(config.interval_ticks);
    let mut engine = PollEngine::new(endpoint, client, scheduler);
    let mut sink = TracingSink;

    let mut heartbeat = tokio::time::interval(HEARTBEAT_PERIOD);
    loop {
        heartbeat.tick().await;
        engine.heartbeat(&mut sink).await;
    }
}
