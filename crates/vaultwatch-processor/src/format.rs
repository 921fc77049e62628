//! `MessageFormatter`: turns one [`Event`] into a message, or a reason not to.
//!
//! Formatting is pure: the same event always yields the same [`Decision`].
//! Network-dependent filtering lives in [`crate::filter`].

use std::fmt;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use vaultwatch_abi::display_value;
use vaultwatch_core::Event;

use crate::amount;
use crate::rules::{Field, Rule, RuleTable};

/// How amounts of the vault's asset are shown next to the raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDisplay {
    pub decimals: Option<u8>,
    pub symbol: Option<String>,
}

impl AssetDisplay {
    /// `"2 USDC"`, `"1.5K"`, or `None` when no decimals are configured.
    pub fn annotate(&self, amount: U256) -> Option<String> {
        let decimals = self.decimals?;
        let shown = amount::friendly(amount::normalize(amount, decimals));
        Some(match &self.symbol {
            Some(symbol) => format!("{shown} {symbol}"),
            None => shown,
        })
    }
}

/// Why an event produced no message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Routine event kind.
    Routine,
    /// Threshold-gated kind, but no minimum configured.
    ThresholdUnset,
    BelowThreshold { amount: U256, threshold: U256 },
    /// The gated argument is missing or not an integer.
    NotAnAmount { index: usize },
    /// Author filter matched.
    IgnoredSender { sender: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "routine event"),
            Self::ThresholdUnset => write!(f, "no minimum amount configured"),
            Self::BelowThreshold { amount, threshold } => {
                write!(f, "amount {amount} below threshold {threshold}")
            }
            Self::NotAnAmount { index } => write!(f, "argument {index} is not an amount"),
            Self::IgnoredSender { sender } => write!(f, "sent by ignored address {sender}"),
        }
    }
}

/// Outcome of formatting one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Send(String),
    Skip(SkipReason),
}

impl Decision {
    pub fn into_message(self) -> Option<String> {
        match self {
            Self::Send(text) => Some(text),
            Self::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageFormatter {
    label: String,
    explorer_uri: String,
    threshold: Option<U256>,
    asset: AssetDisplay,
    rules: RuleTable,
}

impl MessageFormatter {
    pub fn new(label: impl Into<String>, explorer_uri: impl Into<String>, rules: RuleTable) -> Self {
        Self {
            label: label.into(),
            explorer_uri: explorer_uri.into(),
            threshold: None,
            asset: AssetDisplay::default(),
            rules,
        }
    }

    /// Minimum amount for threshold-gated events. `None` silences them all.
    pub fn with_threshold(mut self, threshold: Option<U256>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_asset(mut self, asset: AssetDisplay) -> Self {
        self.asset = asset;
        self
    }

    pub fn tx_link(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_uri.trim_end_matches('/'), tx_hash)
    }

    /// Message text for `event`, or `None` when it should not be announced.
    pub fn build_message_from_event(&self, event: &Event) -> Option<String> {
        self.decide(event).into_message()
    }

    pub fn decide(&self, event: &Event) -> Decision {
        match self.rules.rule_for(event) {
            None => Decision::Send(self.render_generic(event)),
            Some(Rule::Suppressed) => Decision::Skip(SkipReason::Routine),
            Some(Rule::Unconditional { fields }) => {
                Decision::Send(self.render(event, None, fields))
            }
            Some(Rule::ThresholdGated {
                amount_index,
                fields,
            }) => {
                let Some(threshold) = self.threshold else {
                    return Decision::Skip(SkipReason::ThresholdUnset);
                };
                let Some(amount) = amount_arg(event, *amount_index) else {
                    return Decision::Skip(SkipReason::NotAnAmount {
                        index: *amount_index,
                    });
                };
                if amount < threshold {
                    return Decision::Skip(SkipReason::BelowThreshold { amount, threshold });
                }
                let annotation = self.asset.annotate(amount);
                Decision::Send(self.render(event, annotation.as_deref(), fields))
            }
        }
    }

    fn header(&self, event: &Event, annotation: Option<&str>) -> Vec<String> {
        let title = match annotation {
            Some(a) => format!("[{}] {} ({a})", self.label, event.name),
            None => format!("[{}] {}", self.label, event.name),
        };
        vec![
            title,
            format!("tx: {}", self.tx_link(&event.tx_hash)),
            format!("block: {}", event.block),
        ]
    }

    fn render(&self, event: &Event, annotation: Option<&str>, fields: &[Field]) -> String {
        let mut lines = self.header(event, annotation);
        for (i, field) in fields.iter().enumerate() {
            match field {
                Field::Scalar(name) => {
                    lines.push(format!("{name}: {}", event.arg(i).unwrap_or("")));
                }
                Field::List(name) => match event.original_arg(i) {
                    Some(DynSolValue::Array(items)) | Some(DynSolValue::FixedArray(items)) => {
                        lines.push(format!("{name}:"));
                        lines.extend(items.iter().map(|item| format!("- {}", display_value(item))));
                    }
                    _ => lines.push(format!("{name}: {}", event.arg(i).unwrap_or(""))),
                },
            }
        }
        lines.join("\n")
    }

    fn render_generic(&self, event: &Event) -> String {
        let mut lines = self.header(event, None);
        lines.extend(
            event
                .args
                .iter()
                .enumerate()
                .map(|(i, arg)| format!("arg{i}: {arg}")),
        );
        lines.join("\n")
    }
}

/// The gated amount, preferring the native integer over the string form.
fn amount_arg(event: &Event, index: usize) -> Option<U256> {
    match event.original_arg(index) {
        Some(DynSolValue::Uint(value, _)) => Some(*value),
        _ => event
            .arg(index)
            .and_then(|s| U256::from_str_radix(s, 10).ok()),
    }
}
