//! vaultwatch-core: shared types for the vault event pipeline.
//!
//! # Overview
//!
//! vaultwatch follows a single contract's logs over a WebSocket subscription
//! and turns them into chat notifications. Data flows strictly one way:
//!
//! ```text
//! node ──▶ SubscriptionClient ──▶ EventQueue ──▶ EventProcessor ──▶ Notifier
//! ```
//!
//! The core crate defines the pieces every stage agrees on:
//!
//! - [`Event`] / [`RawLog`]: the unit of work and its undecoded source
//! - [`EventQueue`]: ordered, unbounded, single-writer/single-reader hand-off
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types
//! - [`RpcTransport`]: request/response seam used by the sender lookup
//! - [`Notifier`] / [`SenderLookup`]: outbound collaborators of the processor
//! - [`error`] module: structured error types

pub mod error;
pub mod event;
pub mod queue;
pub mod request;
pub mod sink;
pub mod transport;

pub use error::{ConfigError, DecodeError, NotifyError, TransportError};
pub use event::{Event, RawLog};
pub use queue::EventQueue;
pub use request::{IncomingMessage, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use sink::{Notifier, SenderLookup};
pub use transport::RpcTransport;
