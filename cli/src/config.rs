//! Command-line / environment configuration.
//!
//! Every flag can also be supplied through the environment variable shown
//! in `--help`, so the watcher runs from a plain env file.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use vaultwatch_core::ConfigError;
use vaultwatch_processor::AssetDisplay;
use vaultwatch_ws::SubscriptionConfig;

use crate::logging::LogConfig;

/// Morpho's public allocator on Ethereum mainnet.
const PUBLIC_ALLOCATOR: &str = "0xfd32fA2ca22c76dD6E550706Ad913FC6CE91c75D";

#[derive(Debug, Parser)]
#[command(
    name = "vaultwatch",
    about = "Follow a MetaMorpho vault's events and post them to Telegram",
    version
)]
pub struct Cli {
    /// WebSocket JSON-RPC endpoint
    #[arg(long, env = "WSS_PROVIDER")]
    pub wss_url: String,

    /// Address of the watched vault
    #[arg(long, env = "METAMORPHO_ADDRESS")]
    pub vault_address: String,

    /// Display label used in message headers (defaults to the address)
    #[arg(long, env = "METAMORPHO_NAME")]
    pub vault_name: Option<String>,

    /// Block explorer base URI for transaction links
    #[arg(long, env = "EXPLORER_URI", default_value = "https://etherscan.io")]
    pub explorer_uri: String,

    /// Telegram chat that receives notifications
    #[arg(long, env = "TG_CHAT_ID")]
    pub telegram_chat_id: String,

    /// Telegram bot token
    #[arg(long, env = "TG_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: String,

    /// Minimum asset amount (raw integer) for deposits, withdrawals and reallocations
    #[arg(long, env = "MIN_AMOUNT")]
    pub min_amount: Option<String>,

    /// Decimals of the vault asset, for display
    #[arg(long, env = "ASSET_DECIMALS")]
    pub asset_decimals: Option<u8>,

    /// Symbol of the vault asset, for display
    #[arg(long, env = "ASSET_SYMBOL")]
    pub asset_symbol: Option<String>,

    /// Drop reallocations sent by one of --ignored-senders
    #[arg(
        long,
        env = "IGNORE_ALLOCATOR_TX",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub ignore_allocator_tx: bool,

    /// Comma-separated senders whose reallocations are not announced
    #[arg(
        long,
        env = "IGNORED_SENDERS",
        value_delimiter = ',',
        default_value = PUBLIC_ALLOCATOR
    )]
    pub ignored_senders: Vec<String>,

    /// Delay before reconnecting after the WebSocket closes
    #[arg(long, env = "RECONNECT_DELAY_MS", default_value_t = 1_000)]
    pub reconnect_delay_ms: u64,

    /// How often an empty queue is checked
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1_000)]
    pub poll_interval_ms: u64,

    /// Deadline for sender lookups
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,

    /// trace | debug | info | warn | error
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit JSON logs
    #[arg(
        long,
        env = "LOG_JSON",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: bool,
}

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub subscription: SubscriptionConfig,
    pub label: String,
    pub explorer_uri: String,
    pub chat_id: String,
    pub bot_token: String,
    pub threshold: Option<U256>,
    pub asset: AssetDisplay,
    /// `Some` when the author filter is enabled.
    pub ignored_senders: Option<Vec<String>>,
    pub poll_interval: Duration,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            json: self.log_json,
        }
    }

    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let address = parse_address("METAMORPHO_ADDRESS", &self.vault_address)?;

        let subscription = SubscriptionConfig::new(self.wss_url, address.to_checksum(None))?
            .with_reconnect_delay(Duration::from_millis(self.reconnect_delay_ms))
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms));

        if self.telegram_chat_id.trim().is_empty() {
            return Err(ConfigError::Missing("TG_CHAT_ID"));
        }
        if self.telegram_bot_token.trim().is_empty() {
            return Err(ConfigError::Missing("TG_BOT_TOKEN"));
        }

        let threshold = self
            .min_amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                U256::from_str_radix(s, 10).map_err(|e| ConfigError::Invalid {
                    name: "MIN_AMOUNT",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let ignored_senders = if self.ignore_allocator_tx {
            let senders = self
                .ignored_senders
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| parse_address("IGNORED_SENDERS", s).map(|a| a.to_checksum(None)))
                .collect::<Result<Vec<_>, _>>()?;
            Some(senders)
        } else {
            None
        };

        Ok(Settings {
            label: self
                .vault_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| subscription.contract_address.clone()),
            subscription,
            explorer_uri: self.explorer_uri,
            chat_id: self.telegram_chat_id,
            bot_token: self.telegram_bot_token,
            threshold,
            asset: AssetDisplay {
                decimals: self.asset_decimals,
                symbol: self.asset_symbol,
            },
            ignored_senders,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}

fn parse_address(name: &'static str, value: &str) -> Result<Address, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(name));
    }
    value.trim().parse::<Address>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
