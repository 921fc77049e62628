//! Transaction sender lookup over any [`RpcTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use vaultwatch_core::{RpcTransport, SenderLookup};

/// The only field of `eth_getTransactionByHash` we care about.
#[derive(Debug, Deserialize)]
struct TransactionView {
    from: Option<String>,
}

/// Resolves senders with `eth_getTransactionByHash`.
///
/// Every failure (transport error, timeout, unknown transaction) yields
/// `None`.
pub struct RpcSenderLookup<T> {
    transport: Arc<T>,
}

impl<T: RpcTransport> RpcSenderLookup<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: RpcTransport> SenderLookup for RpcSenderLookup<T> {
    async fn transaction_sender(&self, tx_hash: &str) -> Option<String> {
        let result: Result<Option<TransactionView>, _> = self
            .transport
            .call(
                "eth_getTransactionByHash",
                vec![Value::String(tx_hash.to_string())],
            )
            .await;

        match result {
            Ok(Some(tx)) => tx.from,
            Ok(None) => {
                debug!(tx = %tx_hash, "transaction not found");
                None
            }
            Err(e) if e.is_retryable() => {
                warn!(error = %e, tx = %tx_hash, url = %self.transport.url(), "sender lookup failed, connection unavailable");
                None
            }
            Err(e) => {
                warn!(error = %e, tx = %tx_hash, url = %self.transport.url(), "sender lookup rejected");
                None
            }
        }
    }
}
