//! Error types shared across the pipeline.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to the log source.
#[derive(Debug, Error)]
pub enum TransportError {
    /// WebSocket connection/send/receive error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// The connection went away while a request was in flight.
    #[error("connection closed")]
    Closed,

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns `true` if the error is cured by reconnecting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WebSocket(_) | Self::Closed | Self::Timeout { .. })
    }
}

/// Errors that can occur while decoding a single log entry.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("log has no topics")]
    NoTopics,

    #[error("unknown event selector {selector}")]
    UnknownSelector { selector: String },

    #[error("invalid raw log: {reason}")]
    InvalidRawLog { reason: String },

    #[error("ABI decode failed for {event}: {reason}")]
    AbiDecodeFailed { event: String, reason: String },
}

/// Errors from the notification sink.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification credentials missing: {what}")]
    MissingCredentials { what: &'static str },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("rejected by API ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Startup configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
