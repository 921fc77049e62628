//! `EventProcessor`: the single consumer of the event queue.
//!
//! Events are taken one at a time, in queue order, and each is filtered,
//! formatted and dispatched before the next one is looked at. An empty
//! queue is polled at a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{error, info};
use vaultwatch_core::{Event, EventQueue, NotifyError, Notifier};

use crate::filter::AuthorFilter;
use crate::format::{Decision, MessageFormatter, SkipReason};

/// What happened to one event.
#[derive(Debug)]
pub enum ProcessOutcome {
    Sent,
    Skipped(SkipReason),
    /// Delivery failed; not retried.
    Failed(NotifyError),
}

pub struct EventProcessor {
    queue: EventQueue,
    formatter: MessageFormatter,
    notifier: Arc<dyn Notifier>,
    author_filter: Option<AuthorFilter>,
    poll_interval: Duration,
}

impl EventProcessor {
    pub fn new(queue: EventQueue, formatter: MessageFormatter, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            queue,
            formatter,
            notifier,
            author_filter: None,
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_author_filter(mut self, filter: AuthorFilter) -> Self {
        self.author_filter = Some(filter);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Drain the queue forever.
    pub async fn run(&self) {
        info!(poll_ms = self.poll_interval.as_millis() as u64, "started the event processor");
        loop {
            match self.queue.pop_front() {
                Some(event) => {
                    self.process(event).await;
                }
                None => time::sleep(self.poll_interval).await,
            }
        }
    }

    /// Process whatever is queued right now and return.
    pub async fn drain(&self) -> Vec<ProcessOutcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            outcomes.push(self.process(event).await);
        }
        outcomes
    }

    /// Filter, format and dispatch one event.
    pub async fn process(&self, event: Event) -> ProcessOutcome {
        info!(
            block = event.block,
            event = %event.name,
            tx = %event.tx_hash,
            args = ?event.args,
            "new event detected"
        );

        let decision = match self.author_filter.as_ref() {
            Some(filter) => match filter.ignored_sender(&event).await {
                Some(sender) => Decision::Skip(SkipReason::IgnoredSender { sender }),
                None => self.formatter.decide(&event),
            },
            None => self.formatter.decide(&event),
        };

        let text = match decision {
            Decision::Send(text) => text,
            Decision::Skip(reason) => {
                info!(event = %event.name, tx = %event.tx_hash, %reason, "nothing to send");
                return ProcessOutcome::Skipped(reason);
            }
        };

        match self.notifier.send_message(&text).await {
            Ok(()) => {
                info!(event = %event.name, tx = %event.tx_hash, "notification sent");
                ProcessOutcome::Sent
            }
            Err(e) => {
                error!(error = %e, event = %event.name, tx = %event.tx_hash, "notification failed");
                ProcessOutcome::Failed(e)
            }
        }
    }
}
