//! `SubscriptionClient`: owns the WebSocket connection to the log source.
//!
//! A background task holds the connection, subscribes to the watched
//! contract's logs, decodes every notification and pushes the result onto
//! the [`EventQueue`]. When the connection closes for any reason the task
//! waits a fixed delay, reconnects and subscribes again. It never gives up.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use vaultwatch_abi::EventDecoder;
use vaultwatch_core::{
    ConfigError, EventQueue, IncomingMessage, JsonRpcRequest, JsonRpcResponse, RpcTransport,
    TransportError,
};

use crate::log_parser;
use crate::subscriptions::{SubscriptionId, SubscriptionSlot};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = HashMap<u64, oneshot::Sender<Result<JsonRpcResponse, TransportError>>>;

/// Configuration for the subscription client.
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    /// WebSocket JSON-RPC endpoint (`ws://` or `wss://`).
    pub url: String,
    /// Contract whose logs are followed.
    pub contract_address: String,
    /// Wait between a close and the next connection attempt.
    pub reconnect_delay: Duration,
    /// Deadline for request/response calls such as sender lookups.
    pub request_timeout: Duration,
}

impl SubscriptionConfig {
    /// Both values are startup preconditions; empty ones are rejected.
    pub fn new(
        url: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let url = url.into();
        let contract_address = contract_address.into();
        if url.trim().is_empty() {
            return Err(ConfigError::Missing("WSS_PROVIDER"));
        }
        if contract_address.trim().is_empty() {
            return Err(ConfigError::Missing("METAMORPHO_ADDRESS"));
        }
        Ok(Self {
            url,
            contract_address,
            reconnect_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
        })
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Command sent from callers to the background task.
enum WsCommand {
    Send {
        req: JsonRpcRequest,
        tx: oneshot::Sender<Result<JsonRpcResponse, TransportError>>,
    },
    Close,
}

/// Connection lifecycle of the background task. The stream only exists
/// while connected.
enum ConnectionState {
    Disconnected,
    Connected(WsStream),
}

/// Why a connected session ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// Remote close, transport error or rejected subscription.
    Dropped,
    /// The client handle went away.
    Shutdown,
}

/// Handle to the running subscription.
///
/// Dropping the handle stops the background task.
pub struct SubscriptionClient {
    url: String,
    cmd_tx: mpsc::UnboundedSender<WsCommand>,
    connected: Arc<AtomicBool>,
    req_id: Arc<AtomicU64>,
    request_timeout: Duration,
}

impl SubscriptionClient {
    /// Start the background task. Returns at once; the first connection is
    /// made asynchronously and retried like any later one.
    pub fn connect(config: SubscriptionConfig, decoder: EventDecoder, queue: EventQueue) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));
        let req_id = Arc::new(AtomicU64::new(1));

        let worker = Worker {
            config: config.clone(),
            decoder,
            queue,
            connected: Arc::clone(&connected),
            req_id: Arc::clone(&req_id),
            slot: SubscriptionSlot::new(),
            pending: HashMap::new(),
        };
        tokio::spawn(worker.run(cmd_rx));

        Self {
            url: config.url,
            cmd_tx,
            connected,
            req_id,
            request_timeout: config.request_timeout,
        }
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

impl Drop for SubscriptionClient {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(WsCommand::Close);
    }
}

#[async_trait]
impl RpcTransport for SubscriptionClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(WsCommand::Send { req, tx })
            .map_err(|_| TransportError::WebSocket("subscription task stopped".into()))?;

        match time::timeout(self.request_timeout, rx).await {
            Err(_) => Err(TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }),
            Ok(Err(_)) => Err(TransportError::Closed),
            Ok(Ok(result)) => result,
        }
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.req_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Register a reply slot, dropping those whose caller already gave up.
fn track_pending(
    pending: &mut PendingMap,
    id: u64,
    tx: oneshot::Sender<Result<JsonRpcResponse, TransportError>>,
) {
    pending.retain(|_, waiting| !waiting.is_closed());
    pending.insert(id, tx);
}

/// State owned by the background task.
struct Worker {
    config: SubscriptionConfig,
    decoder: EventDecoder,
    queue: EventQueue,
    connected: Arc<AtomicBool>,
    req_id: Arc<AtomicU64>,
    slot: SubscriptionSlot,
    pending: PendingMap,
}

impl Worker {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<WsCommand>) {
        let mut state = ConnectionState::Disconnected;

        loop {
            state = match state {
                ConnectionState::Disconnected => {
                    info!(url = %self.config.url, "connecting via WebSocket");
                    match tokio_tungstenite::connect_async(&self.config.url).await {
                        Ok((ws, _)) => {
                            self.connected.store(true, Ordering::Relaxed);
                            ConnectionState::Connected(ws)
                        }
                        Err(e) => {
                            warn!(
                                error = %e,
                                "WS connect failed, retrying in {:?}",
                                self.config.reconnect_delay
                            );
                            if !self.wait_reconnect(&mut cmd_rx).await {
                                return;
                            }
                            ConnectionState::Disconnected
                        }
                    }
                }
                ConnectionState::Connected(ws) => {
                    let end = self.session(ws, &mut cmd_rx).await;

                    self.connected.store(false, Ordering::Relaxed);
                    if let Some(old) = self.slot.clear() {
                        debug!(subscription = %old, "subscription detached");
                    }
                    // Dropping the senders fails every in-flight request.
                    self.pending.clear();

                    if end == SessionEnd::Shutdown {
                        info!("subscription client stopped");
                        return;
                    }
                    warn!(
                        url = %self.config.url,
                        "WS disconnected, reconnecting in {:?}",
                        self.config.reconnect_delay
                    );
                    if !self.wait_reconnect(&mut cmd_rx).await {
                        return;
                    }
                    ConnectionState::Disconnected
                }
            };
        }
    }

    /// Sleep out the reconnect delay. Requests arriving meanwhile fail at
    /// once; returns `false` if the client handle was dropped.
    async fn wait_reconnect(&self, cmd_rx: &mut mpsc::UnboundedReceiver<WsCommand>) -> bool {
        let delay = time::sleep(self.config.reconnect_delay);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => return true,
                cmd = cmd_rx.recv() => match cmd {
                    None | Some(WsCommand::Close) => {
                        info!("subscription client stopped");
                        return false;
                    }
                    Some(WsCommand::Send { tx, .. }) => {
                        let _ = tx.send(Err(TransportError::Closed));
                    }
                },
            }
        }
    }

    /// Subscribe on a fresh connection and pump it until it ends.
    async fn session(
        &mut self,
        ws: WsStream,
        cmd_rx: &mut mpsc::UnboundedReceiver<WsCommand>,
    ) -> SessionEnd {
        let (mut sink, mut stream) = ws.split();

        let sub_id = self.req_id.fetch_add(1, Ordering::Relaxed);
        if let Some(old) = self.slot.begin(sub_id) {
            debug!(subscription = %old, "detached previous subscription");
        }
        let req = JsonRpcRequest::subscribe_logs(sub_id, &self.config.contract_address);
        let sent = match serde_json::to_string(&req) {
            Ok(text) => sink.send(Message::Text(text.into())).await.is_ok(),
            Err(_) => false,
        };
        if !sent {
            warn!("failed to send eth_subscribe");
            return SessionEnd::Dropped;
        }
        info!(address = %self.config.contract_address, "started the event listener");

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    None | Some(WsCommand::Close) => {
                        let _ = sink.close().await;
                        return SessionEnd::Shutdown;
                    }
                    Some(WsCommand::Send { req, tx }) => {
                        let Some(id) = req.id.as_number() else {
                            let _ = tx.send(Err(TransportError::WebSocket(
                                "only numeric request ids are supported".into(),
                            )));
                            continue;
                        };
                        let text = match serde_json::to_string(&req) {
                            Ok(text) => text,
                            Err(e) => {
                                let _ = tx.send(Err(TransportError::Deserialization(e)));
                                continue;
                            }
                        };
                        track_pending(&mut self.pending, id, tx);
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            return SessionEnd::Dropped;
                        }
                    }
                },
                msg = stream.next() => match msg {
                    None => return SessionEnd::Dropped,
                    Some(Err(e)) => {
                        warn!(error = %e, "WS receive error");
                        return SessionEnd::Dropped;
                    }
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = self.handle_text(text.as_str()) {
                            warn!(error = %e, "subscription failed");
                            return SessionEnd::Dropped;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "WebSocket closed by server");
                        return SessionEnd::Dropped;
                    }
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    fn handle_text(&mut self, text: &str) -> Result<(), TransportError> {
        match IncomingMessage::parse(text) {
            Some(IncomingMessage::Notification {
                subscription,
                result,
            }) => {
                if !self.slot.accepts(&subscription) {
                    debug!(%subscription, "dropping notification for inactive subscription");
                    return Ok(());
                }
                self.ingest(&result);
                Ok(())
            }
            Some(IncomingMessage::Response(resp)) => {
                let Some(id) = resp.id.as_number() else {
                    return Ok(());
                };
                if self.slot.is_pending(id) {
                    return self.confirm_subscription(id, resp);
                }
                if let Some(tx) = self.pending.remove(&id) {
                    let _ = tx.send(Ok(resp));
                }
                Ok(())
            }
            None => {
                debug!("ignoring unrecognised WS frame");
                Ok(())
            }
        }
    }

    fn confirm_subscription(&mut self, id: u64, resp: JsonRpcResponse) -> Result<(), TransportError> {
        match resp.into_result() {
            Ok(Value::String(sub)) => {
                info!(subscription = %sub, "subscribed to logs");
                self.slot.confirm(id, SubscriptionId(sub));
                Ok(())
            }
            Ok(other) => Err(TransportError::WebSocket(format!(
                "unexpected eth_subscribe result: {other}"
            ))),
            Err(e) => Err(TransportError::Rpc(e)),
        }
    }

    /// Decode one log and enqueue it. Bad entries are logged and skipped.
    fn ingest(&self, result: &Value) {
        let Some(raw) = log_parser::parse_log(result, &self.config.contract_address) else {
            debug!("skipping removed, foreign or malformed log");
            return;
        };

        match self.decoder.decode(&raw) {
            Ok(event) => {
                debug!(block = event.block, event = %event.name, tx = %event.tx_hash, "event queued");
                self.queue.push(event);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    block = raw.block_number,
                    tx = %raw.tx_hash,
                    "could not decode log, skipping"
                );
            }
        }
    }
}
