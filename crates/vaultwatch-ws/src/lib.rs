//! vaultwatch-ws: live log subscription with automatic reconnect.
//!
//! # Features
//! - One `eth_subscribe("logs")` registration per connection, never more
//! - Fixed-delay reconnect after any close or transport error, no cap
//! - Decode-and-enqueue of every log of the watched contract
//! - Request multiplexing over the same connection (sender lookups)

pub mod client;
pub mod log_parser;
pub mod lookup;
pub mod subscriptions;

pub use client::{SubscriptionClient, SubscriptionConfig};
pub use lookup::RpcSenderLookup;
pub use subscriptions::{SubscriptionId, SubscriptionSlot};
