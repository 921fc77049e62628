//! The single subscription registration of a connection.
//!
//! A connection carries at most one live `eth_subscribe` id. Starting a
//! new registration always forgets the previous one first, so a
//! notification for an old id can never be delivered twice.

/// A subscription id returned by `eth_subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub String);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum SlotState {
    #[default]
    Empty,
    /// `eth_subscribe` sent, confirmation not yet seen.
    Pending { request_id: u64 },
    Active(SubscriptionId),
}

/// Tracks the one registration allowed on the current connection.
#[derive(Debug, Default)]
pub struct SubscriptionSlot {
    state: SlotState,
}

impl SubscriptionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new registration. Any previous one is detached and returned.
    pub fn begin(&mut self, request_id: u64) -> Option<SubscriptionId> {
        let previous = self.clear();
        self.state = SlotState::Pending { request_id };
        previous
    }

    /// Whether `request_id` is the outstanding `eth_subscribe` call.
    pub fn is_pending(&self, request_id: u64) -> bool {
        self.state == SlotState::Pending { request_id }
    }

    /// Record the id the node assigned. Ignored unless `request_id` is the
    /// outstanding call.
    pub fn confirm(&mut self, request_id: u64, id: SubscriptionId) -> bool {
        if self.is_pending(request_id) {
            self.state = SlotState::Active(id);
            true
        } else {
            false
        }
    }

    /// Whether a notification tagged `id` belongs to the live registration.
    pub fn accepts(&self, id: &str) -> bool {
        matches!(&self.state, SlotState::Active(active) if active.0 == id)
    }

    /// Drop the registration (connection gone).
    pub fn clear(&mut self) -> Option<SubscriptionId> {
        match std::mem::take(&mut self.state) {
            SlotState::Active(id) => Some(id),
            _ => None,
        }
    }
}
