//! vaultwatch: follow a MetaMorpho vault over a WebSocket subscription and
//! announce the interesting events on Telegram.

mod config;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use vaultwatch_abi::EventDecoder;
use vaultwatch_core::EventQueue;
use vaultwatch_processor::{AuthorFilter, EventProcessor, MessageFormatter, RuleTable, TelegramNotifier};
use vaultwatch_ws::{RpcSenderLookup, SubscriptionClient};

use config::{Cli, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_config());

    let settings = cli.into_settings().context("invalid configuration")?;
    run(settings).await
}

async fn run(settings: Settings) -> Result<()> {
    let decoder = EventDecoder::metamorpho().context("failed to load the vault ABI")?;
    let notifier = TelegramNotifier::new(settings.bot_token, settings.chat_id)
        .context("failed to set up Telegram")?;

    info!(
        vault = %settings.subscription.contract_address,
        label = %settings.label,
        events = decoder.len(),
        "starting vaultwatch"
    );

    let queue = EventQueue::new();
    let client = Arc::new(SubscriptionClient::connect(
        settings.subscription,
        decoder,
        queue.clone(),
    ));

    let formatter = MessageFormatter::new(settings.label, settings.explorer_uri, RuleTable::metamorpho())
        .with_threshold(settings.threshold)
        .with_asset(settings.asset);

    let mut processor = EventProcessor::new(queue, formatter, Arc::new(notifier))
        .with_poll_interval(settings.poll_interval);

    if let Some(ignored) = settings.ignored_senders {
        info!(senders = ?ignored, "reallocations from these senders will not be announced");
        let lookup = RpcSenderLookup::new(client.clone());
        processor = processor.with_author_filter(AuthorFilter::new(Arc::new(lookup), ignored));
    }

    tokio::select! {
        _ = processor.run() => {}
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for ctrl-c")?;
            info!("interrupted, shutting down");
        }
    }

    drop(client);
    Ok(())
}
