//! `EventQueue`: ordered hand-off between the subscription client and the
//! processor.
//!
//! One producer pushes, one consumer pops. The queue is unbounded and never
//! blocks either side; a short critical section under a mutex is all the
//! synchronization it needs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::event::Event;

/// FIFO of pending events. Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<Event>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        // A panic while holding the lock cannot leave a VecDeque half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append to the tail.
    pub fn push(&self, event: Event) {
        self.lock().push_back(event);
    }

    /// Remove and return the head, or `None` if empty.
    pub fn pop_front(&self) -> Option<Event> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(block: u64) -> Event {
        Event {
            name: "Deposit".into(),
            args: vec![],
            original_args: vec![],
            block,
            tx_hash: format!("0x{block:x}"),
        }
    }

    #[test]
    fn pops_in_push_order() {
        let q = EventQueue::new();
        for b in [5, 5, 6, 9] {
            q.push(event(b));
        }
        let popped: Vec<u64> = std::iter::from_fn(|| q.pop_front()).map(|e| e.block).collect();
        assert_eq!(popped, vec![5, 5, 6, 9]);
        assert!(q.pop_front().is_none());
    }

    #[test]
    fn length_tracks_push_and_pop() {
        let q = EventQueue::new();
        assert!(q.is_empty());
        q.push(event(1));
        assert_eq!(q.len(), 1);
        q.push(event(2));
        assert_eq!(q.len(), 2);
        q.pop_front();
        assert_eq!(q.len(), 1);
        q.pop_front();
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn handles_share_state() {
        let producer = EventQueue::new();
        let consumer = producer.clone();
        producer.push(event(42));
        assert_eq!(consumer.pop_front().map(|e| e.block), Some(42));
        assert!(producer.is_empty());
    }

    #[tokio::test]
    async fn concurrent_producer_keeps_order() {
        let q = EventQueue::new();
        let producer = q.clone();
        let handle = tokio::spawn(async move {
            for b in 0..1_000u64 {
                producer.push(event(b));
                if b % 100 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        });

        let mut seen = Vec::new();
        while seen.len() < 1_000 {
            match q.pop_front() {
                Some(e) => seen.push(e.block),
                None => tokio::task::yield_now().await,
            }
        }
        handle.await.unwrap();
        assert_eq!(seen, (0..1_000u64).collect::<Vec<_>>());
    }
}
