//! Outbound collaborators of the event processor.

use async_trait::async_trait;

use crate::error::NotifyError;

/// Delivers a finished message to the chat destination.
///
/// Fire-and-forget from the pipeline's point of view: the processor logs a
/// failure and moves on, it never retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError>;
}

/// Resolves the sender (`from`) of a transaction.
///
/// Returns `None` when the sender cannot be determined for any reason;
/// callers treat that as "unknown", never as an error.
#[async_trait]
pub trait SenderLookup: Send + Sync {
    async fn transaction_sender(&self, tx_hash: &str) -> Option<String>;
}
