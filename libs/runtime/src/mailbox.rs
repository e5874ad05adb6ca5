//! Mailbox contract and the in-memory FIFO mailbox
//!
//! The mailbox is the buffering boundary between producers calling
//! `deliver()` and the single dispatch loop. It records messages and hands
//! them back; it never executes, inspects or validates them.

use crate::message::Message;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Buffering boundary between message delivery and message processing.
///
/// Ordering is an implementation policy; the trait does not promise one.
#[async_trait]
pub trait Mailbox: Send + Sync + 'static {
    /// Record a message for later processing. Must not block.
    fn enqueue(&self, message: Arc<Message>);

    /// Remove and return the next message, or `None` when empty. Must not block.
    fn dequeue(&self) -> Option<Arc<Message>>;

    /// Number of buffered messages, for observability only
    fn size(&self) -> usize;

    /// Whether nothing is buffered
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Suspend the dispatch loop while the mailbox is empty.
    ///
    /// Waits at most `idle`. Implementations that can signal arrivals may
    /// return as soon as a message is enqueued.
    async fn wait_for_message(&self, idle: Duration) {
        tokio::time::sleep(idle).await;
    }
}

/// Unbounded FIFO mailbox held in process memory.
///
/// Safe to enqueue from any thread while the loop dequeues. Contents are lost
/// when the mailbox is dropped.
#[derive(Debug, Default)]
pub struct InMemoryMailbox {
    queue: Mutex<VecDeque<Arc<Message>>>,
    arrivals: Notify,
}

impl InMemoryMailbox {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Mailbox for InMemoryMailbox {
    fn enqueue(&self, message: Arc<Message>) {
        self.queue.lock().push_back(message);
        // Stores a permit when the loop is not waiting yet, so a message
        // enqueued between an empty dequeue and the wait is not slept on.
        self.arrivals.notify_one();
    }

    fn dequeue(&self) -> Option<Arc<Message>> {
        self.queue.lock().pop_front()
    }

    fn size(&self) -> usize {
        self.queue.lock().len()
    }

    async fn wait_for_message(&self, idle: Duration) {
        if !self.is_empty() {
            return;
        }
        // Timing out is the normal idle path
        let _ = tokio::time::timeout(idle, self.arrivals.notified()).await;
    }
}
