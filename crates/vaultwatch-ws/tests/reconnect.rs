//! Reconnect behaviour against an in-process WebSocket node.
//!
//! The fake node closes the first connection right after confirming the
//! subscription, then on the second connection pushes one notification for
//! the stale subscription id, one undecodable log and one valid log.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy_primitives::{keccak256, Address, B256, U256};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use vaultwatch_abi::EventDecoder;
use vaultwatch_core::{EventQueue, RpcTransport, SenderLookup};
use vaultwatch_ws::{RpcSenderLookup, SubscriptionClient, SubscriptionConfig};

const VAULT: &str = "0xbeef01735c132ada46aa9aa4c54623caa92a64cb";
const CALLER: &str = "0x1111111111111111111111111111111111111111";

fn set_timelock_log(tx: &str) -> Value {
    let caller: Address = CALLER.parse().unwrap();
    json!({
        "address": VAULT,
        "topics": [
            keccak256("SetTimelock(address,uint256)").to_string(),
            B256::left_padding_from(caller.as_slice()).to_string(),
        ],
        "data": format!("0x{}", hex::encode(U256::from(604_800u64).to_be_bytes::<32>())),
        "blockNumber": "0x10",
        "logIndex": "0x0",
        "transactionHash": tx,
        "removed": false
    })
}

fn unknown_log() -> Value {
    json!({
        "address": VAULT,
        "topics": [B256::repeat_byte(0x42).to_string()],
        "data": "0x",
        "blockNumber": "0x10",
        "logIndex": "0x1",
        "transactionHash": "0xbad",
        "removed": false
    })
}

fn notification(sub: &str, result: Value) -> Message {
    Message::Text(
        json!({
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": { "subscription": sub, "result": result }
        })
        .to_string()
        .into(),
    )
}

/// Read the next request frame and return it as JSON.
async fn next_request<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("client went away: {other:?}"),
        }
    }
}

fn reply(id: &Value, result: Value) -> Message {
    Message::Text(json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string().into())
}

async fn wait_for_len(queue: &EventQueue, len: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while queue.len() < len {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("events did not arrive in time");
}

async fn wait_connected(client: &SubscriptionClient) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !client.is_connected() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("client did not connect in time");
}

#[tokio::test]
async fn reconnect_delivers_each_log_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let node = tokio::spawn(async move {
        // First connection: confirm, then hang up.
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let sub = next_request(&mut ws).await;
        assert_eq!(sub["method"], "eth_subscribe");
        assert_eq!(sub["params"][1]["address"], VAULT);
        ws.send(reply(&sub["id"], json!("0xold"))).await.unwrap();
        ws.close(None).await.unwrap();
        drop(ws);

        // Second connection: fresh subscription.
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let sub = next_request(&mut ws).await;
        assert_eq!(sub["method"], "eth_subscribe");
        ws.send(reply(&sub["id"], json!("0xnew"))).await.unwrap();

        ws.send(notification("0xold", set_timelock_log("0xstale"))).await.unwrap();
        ws.send(notification("0xnew", unknown_log())).await.unwrap();
        ws.send(notification("0xnew", set_timelock_log("0xgood"))).await.unwrap();

        // Keep the connection open until the client leaves.
        while let Some(Ok(_)) = ws.next().await {}
    });

    let queue = EventQueue::new();
    let config = SubscriptionConfig::new(url, VAULT)
        .unwrap()
        .with_reconnect_delay(Duration::from_millis(50));
    let client = SubscriptionClient::connect(config, EventDecoder::metamorpho().unwrap(), queue.clone());

    wait_for_len(&queue, 1).await;
    // Give any duplicate a chance to show up.
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(queue.len(), 1);
    let event = queue.pop_front().unwrap();
    assert_eq!(event.name, "SetTimelock");
    assert_eq!(event.tx_hash, "0xgood");
    assert_eq!(event.block, 16);
    assert_eq!(event.args[1], "604800");
    assert!(client.is_connected());

    drop(client);
    node.await.unwrap();
}

#[tokio::test]
async fn sender_lookup_rides_the_subscription_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let node = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let sub = next_request(&mut ws).await;
        ws.send(reply(&sub["id"], json!("0x1"))).await.unwrap();

        let req = next_request(&mut ws).await;
        assert_eq!(req["method"], "eth_getTransactionByHash");
        assert_eq!(req["params"][0], "0xabc");
        ws.send(reply(&req["id"], json!({ "hash": "0xabc", "from": CALLER })))
            .await
            .unwrap();

        while let Some(Ok(_)) = ws.next().await {}
    });

    let config = SubscriptionConfig::new(url, VAULT).unwrap();
    let client = Arc::new(SubscriptionClient::connect(
        config,
        EventDecoder::metamorpho().unwrap(),
        EventQueue::new(),
    ));
    assert!(client.url().starts_with("ws://"));

    let lookup = RpcSenderLookup::new(client.clone());
    assert_eq!(lookup.transaction_sender("0xabc").await.as_deref(), Some(CALLER));

    drop(lookup);
    drop(client);
    node.await.unwrap();
}

#[tokio::test]
async fn sender_lookup_fails_open_when_node_hangs_up() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let node = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let sub = next_request(&mut ws).await;
        ws.send(reply(&sub["id"], json!("0x1"))).await.unwrap();

        let req = next_request(&mut ws).await;
        assert_eq!(req["method"], "eth_getTransactionByHash");
        ws.close(None).await.unwrap();
    });

    let timeout = Duration::from_secs(5);
    let config = SubscriptionConfig::new(url, VAULT)
        .unwrap()
        .with_reconnect_delay(Duration::from_secs(60))
        .with_request_timeout(timeout);
    let client = Arc::new(SubscriptionClient::connect(
        config,
        EventDecoder::metamorpho().unwrap(),
        EventQueue::new(),
    ));
    wait_connected(&client).await;

    let lookup = RpcSenderLookup::new(client.clone());
    let started = Instant::now();
    assert!(lookup.transaction_sender("0xabc").await.is_none());
    assert!(started.elapsed() < timeout);

    node.await.unwrap();
}

#[tokio::test]
async fn sender_lookup_fails_open_when_node_stays_silent() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let node = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let sub = next_request(&mut ws).await;
        ws.send(reply(&sub["id"], json!("0x1"))).await.unwrap();

        let req = next_request(&mut ws).await;
        assert_eq!(req["method"], "eth_getTransactionByHash");

        // Never answer; wait for the client to leave.
        while let Some(Ok(_)) = ws.next().await {}
    });

    let timeout = Duration::from_millis(200);
    let config = SubscriptionConfig::new(url, VAULT)
        .unwrap()
        .with_request_timeout(timeout);
    let client = Arc::new(SubscriptionClient::connect(
        config,
        EventDecoder::metamorpho().unwrap(),
        EventQueue::new(),
    ));
    wait_connected(&client).await;

    let lookup = RpcSenderLookup::new(client.clone());
    let started = Instant::now();
    let sender = tokio::time::timeout(Duration::from_secs(5), lookup.transaction_sender("0xabc"))
        .await
        .expect("lookup outlived its deadline");
    assert!(sender.is_none());
    assert!(started.elapsed() >= timeout);
    assert!(client.is_connected());

    drop(lookup);
    drop(client);
    node.await.unwrap();
}
