//! Actors wired up by the ingress binary

use async_trait::async_trait;
use mailbox_runtime::{Actor, ActorResult, Message};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Logs every message it receives
#[derive(Debug, Default)]
pub struct LoggingActor {
    handled: AtomicU64,
}

impl LoggingActor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Actor for LoggingActor {
    async fn handle(&self, message: Arc<Message>) -> ActorResult {
        let handled = self.handled.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            message_type = %message.message_type,
            message_id = %message.message_id,
            source = %message.source,
            target = %message.target,
            timestamp = %message.timestamp,
            payload = %message.payload,
            handled = handled,
            "Message received"
        );
        Ok(())
    }
}
