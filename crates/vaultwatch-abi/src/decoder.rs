//! `EventDecoder`: selector lookup plus ABI decode of a raw log.

use std::collections::HashMap;

use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::Event as AbiEvent;
use alloy_primitives::B256;
use vaultwatch_core::{DecodeError, Event, RawLog};

use crate::{display, metamorpho};

/// Decodes logs of one contract, keyed by event selector.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    events: HashMap<B256, AbiEvent>,
}

impl EventDecoder {
    /// Build a decoder from human-readable event signatures.
    pub fn from_signatures<'a>(
        signatures: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DecodeError> {
        let mut events = HashMap::new();
        for sig in signatures {
            let event = AbiEvent::parse(sig).map_err(|e| DecodeError::InvalidRawLog {
                reason: format!("bad event signature `{sig}`: {e}"),
            })?;
            events.insert(event.selector(), event);
        }
        Ok(Self { events })
    }

    /// Decoder for the MetaMorpho vault ABI.
    pub fn metamorpho() -> Result<Self, DecodeError> {
        Self::from_signatures(metamorpho::EVENTS.iter().copied())
    }

    /// Number of known events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Decode `raw` into an [`Event`]. Unknown selectors and malformed
    /// payloads are errors; the caller decides whether to log and skip.
    pub fn decode(&self, raw: &RawLog) -> Result<Event, DecodeError> {
        let topics = raw
            .topics
            .iter()
            .map(|t| t.parse::<B256>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DecodeError::InvalidRawLog {
                reason: format!("invalid topic hex: {e}"),
            })?;

        let selector = topics.first().ok_or(DecodeError::NoTopics)?;
        let abi = self
            .events
            .get(selector)
            .ok_or_else(|| DecodeError::UnknownSelector {
                selector: selector.to_string(),
            })?;

        let decoded = abi
            .decode_log_parts(topics.iter().copied(), &raw.data, true)
            .map_err(|e| DecodeError::AbiDecodeFailed {
                event: abi.name.clone(),
                reason: e.to_string(),
            })?;

        // Indexed values come from topics, the rest from data; put them back
        // in the order the signature declares them.
        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let original_args = abi
            .inputs
            .iter()
            .map(|p| if p.indexed { indexed.next() } else { body.next() })
            .collect::<Option<Vec<DynSolValue>>>()
            .ok_or_else(|| DecodeError::AbiDecodeFailed {
                event: abi.name.clone(),
                reason: "argument count mismatch".into(),
            })?;

        Ok(Event {
            name: abi.name.clone(),
            args: original_args.iter().map(display::display_value).collect(),
            original_args,
            block: raw.block_number,
            tx_hash: raw.tx_hash.clone(),
        })
    }
}
