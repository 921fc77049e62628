//! vaultwatch-processor: the consumer side of the pipeline.
//!
//! The [`EventProcessor`] drains the [`EventQueue`](vaultwatch_core::EventQueue)
//! one event at a time, asks the [`RuleTable`] what kind of event it is,
//! applies the author filter and amount threshold, renders a message with
//! the [`MessageFormatter`] and hands it to a [`Notifier`](vaultwatch_core::Notifier).

pub mod amount;
pub mod filter;
pub mod format;
pub mod processor;
pub mod rules;
pub mod telegram;

pub use filter::AuthorFilter;
pub use format::{AssetDisplay, Decision, MessageFormatter, SkipReason};
pub use processor::{EventProcessor, ProcessOutcome};
pub use rules::{Field, Rule, RuleTable};
pub use telegram::TelegramNotifier;
