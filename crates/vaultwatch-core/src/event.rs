//! Raw and decoded event types.

use alloy_dyn_abi::DynSolValue;
use serde::{Deserialize, Serialize};

/// An undecoded log entry as pushed by the node.
/// Exists only between receipt and decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract that emitted the log
    pub address: String,
    /// topics[0] is the event selector; the rest are indexed params
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters
    pub data: Vec<u8>,
    /// Block height the log was included at
    pub block_number: u64,
    /// Originating transaction hash (0x-prefixed)
    pub tx_hash: String,
}

/// The pipeline's unit of work: one decoded log of the watched contract.
///
/// Created by the subscription client, consumed exactly once by the
/// processor. Never mutated in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event identifier as declared in the ABI, e.g. `"SetTimelock"`.
    pub name: String,
    /// String form of each argument, in declaration order.
    pub args: Vec<String>,
    /// Native decoded values, same order as `args`.
    pub original_args: Vec<DynSolValue>,
    /// Block height; non-decreasing across the stream, not unique.
    pub block: u64,
    pub tx_hash: String,
}

impl Event {
    /// Lower-cased name used for rule lookup.
    pub fn canonical_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn original_arg(&self, index: usize) -> Option<&DynSolValue> {
        self.original_args.get(index)
    }
}
