//! Author filter: silence reallocations sent by known allocators.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use vaultwatch_core::{Event, SenderLookup};

/// Event kinds the filter looks at.
const FILTERED_KINDS: [&str; 2] = ["reallocatesupply", "reallocatewithdraw"];

/// Suppresses reallocation events whose transaction was sent by one of a
/// configured set of addresses.
///
/// The sender is resolved over the network for every candidate event. If
/// it cannot be resolved the event goes through.
pub struct AuthorFilter {
    lookup: Arc<dyn SenderLookup>,
    ignored: HashSet<String>,
}

impl AuthorFilter {
    pub fn new(lookup: Arc<dyn SenderLookup>, ignored: impl IntoIterator<Item = String>) -> Self {
        Self {
            lookup,
            ignored: ignored.into_iter().map(|a| a.to_ascii_lowercase()).collect(),
        }
    }

    pub fn applies_to(&self, event: &Event) -> bool {
        FILTERED_KINDS.iter().any(|kind| event.is(kind))
    }

    /// Returns the sender if `event` must be suppressed.
    pub async fn ignored_sender(&self, event: &Event) -> Option<String> {
        if !self.applies_to(event) || self.ignored.is_empty() {
            return None;
        }
        let Some(sender) = self.lookup.transaction_sender(&event.tx_hash).await else {
            debug!(tx = %event.tx_hash, "sender unknown, not filtering");
            return None;
        };
        self.ignored
            .contains(&sender.to_ascii_lowercase())
            .then_some(sender)
    }
}
