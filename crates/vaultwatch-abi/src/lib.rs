//! # vaultwatch-abi
//!
//! Turns raw logs of a MetaMorpho vault into [`Event`](vaultwatch_core::Event)s.
//!
//! ## Implementation notes
//! - Uses `alloy-json-abi` human-readable signatures for the event table
//! - topics[0] → event selector (keccak256 of the canonical signature)
//! - topics[1..] → indexed parameters, `data` → non-indexed tuple
//! - Arguments are re-interleaved into declaration order after decoding

pub mod decoder;
pub mod display;
pub mod metamorpho;

pub use decoder::EventDecoder;
pub use display::display_value;
