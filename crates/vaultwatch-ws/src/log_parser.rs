//! `eth_subscription` log payload → [`RawLog`].

use serde_json::Value;
use vaultwatch_core::RawLog;

/// Parse the `result` object of a logs notification.
///
/// Returns `None` for removed (re-orged) logs, logs from another emitter,
/// and payloads missing the fields a log must have.
pub fn parse_log(result: &Value, watched: &str) -> Option<RawLog> {
    if result
        .get("removed")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return None;
    }

    let address = result.get("address")?.as_str()?;
    if !address.eq_ignore_ascii_case(watched) {
        return None;
    }

    let topics: Vec<String> = result
        .get("topics")?
        .as_array()?
        .iter()
        .filter_map(|t| t.as_str().map(String::from))
        .collect();

    let data_hex = result.get("data").and_then(Value::as_str).unwrap_or("0x");
    let data = hex::decode(data_hex.strip_prefix("0x").unwrap_or(data_hex)).ok()?;

    let block_number = hex_to_u64(result.get("blockNumber")?.as_str()?)?;
    let tx_hash = result.get("transactionHash")?.as_str()?.to_string();

    Some(RawLog {
        address: address.to_string(),
        topics,
        data,
        block_number,
        tx_hash,
    })
}

fn hex_to_u64(s: &str) -> Option<u64> {
    u64::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16).ok()
}
