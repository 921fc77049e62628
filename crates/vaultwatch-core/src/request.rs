//! JSON-RPC 2.0 wire types, plus classification of inbound WebSocket frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request ID: string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl RpcId {
    /// Numeric id, if this is one.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }

    /// `eth_subscribe("logs", { address })` for a single contract.
    pub fn subscribe_logs(id: u64, address: &str) -> Self {
        Self::new(
            id,
            "eth_subscribe",
            vec![
                Value::String("logs".into()),
                serde_json::json!({ "address": address }),
            ],
        )
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Unwrap the result value or return the node's error.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.result.unwrap_or(Value::Null))
        }
    }
}

/// One text frame received from the node.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// Reply to a request we sent.
    Response(JsonRpcResponse),
    /// `eth_subscription` push for the given subscription id.
    Notification { subscription: String, result: Value },
}

impl IncomingMessage {
    /// Classify a raw text frame. Returns `None` for frames that are neither.
    pub fn parse(text: &str) -> Option<Self> {
        let val: Value = serde_json::from_str(text).ok()?;

        if val.get("method").and_then(Value::as_str) == Some("eth_subscription") {
            let params = val.get("params")?;
            let subscription = params.get("subscription")?.as_str()?.to_string();
            let result = params.get("result").cloned().unwrap_or(Value::Null);
            return Some(Self::Notification { subscription, result });
        }

        serde_json::from_value::<JsonRpcResponse>(val)
            .ok()
            .map(Self::Response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_request_targets_one_address() {
        let req = JsonRpcRequest::subscribe_logs(7, "0xabc");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["method"], "eth_subscribe");
        assert_eq!(json["params"][0], "logs");
        assert_eq!(json["params"][1]["address"], "0xabc");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn classify_subscription_notification() {
        let msg = r#"{"jsonrpc":"2.0","method":"eth_subscription",
            "params":{"subscription":"0xfeed","result":{"blockNumber":"0x1"}}}"#;
        match IncomingMessage::parse(msg) {
            Some(IncomingMessage::Notification { subscription, result }) => {
                assert_eq!(subscription, "0xfeed");
                assert_eq!(result["blockNumber"], "0x1");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classify_response() {
        let msg = r#"{"jsonrpc":"2.0","id":3,"result":"0xsub"}"#;
        match IncomingMessage::parse(msg) {
            Some(IncomingMessage::Response(resp)) => {
                assert_eq!(resp.id.as_number(), Some(3));
                assert_eq!(resp.into_result().unwrap(), Value::String("0xsub".into()));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn response_into_result_error() {
        let msg = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"boom"}}"#;
        let Some(IncomingMessage::Response(resp)) = IncomingMessage::parse(msg) else {
            panic!("expected response");
        };
        assert_eq!(resp.into_result().unwrap_err().code, -32000);
    }

    #[test]
    fn garbage_is_ignored() {
        assert!(IncomingMessage::parse("not json").is_none());
        assert!(IncomingMessage::parse(r#"{"hello":"world"}"#).is_none());
    }
}
