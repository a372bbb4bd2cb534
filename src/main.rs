use anyhow::Context;
use cleansys::CleansysClient;
use config::{Config, POLL_INTERVAL, STATE_FILE};
use log::LevelFilter;
use monitor::Monitor;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use state::StateStore;
use telegram::TelegramNotifier;

mod cleansys;
mod config;
mod measurement;
mod monitor;
mod state;
mod telegram;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    TermLogger::init(
        LevelFilter::Info,
        ConfigBuilder::new()
            .set_time_format_rfc3339()
            .set_time_offset_to_local()
            .map_err(|_| anyhow::anyhow!("Failed to set time offset to local"))?
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;

    if let Err(e) = run().await {
        log::error!("{e:#}");
    }

    Ok(())
}

pub async fn run() -> Result<(), anyhow::Error> {
    let config = Config::from_env();
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let store = StateStore::new(STATE_FILE);
    let last = store.load();
    log::info!(
        "Last notified reading: {} / {:?}",
        last.timestamp.as_deref().unwrap_or("none"),
        last.nox
    );

    let mut monitor = Monitor::new(
        CleansysClient::new(client.clone(), config.api_key),
        TelegramNotifier::new(client, config.bot_token, config.chat_id),
        store,
        last,
    );

    monitor.run(POLL_INTERVAL).await
}
