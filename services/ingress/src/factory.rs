//! Producer-side message construction
//!
//! The runtime never fills in ids or timestamps; the ingress does it here
//! for every accepted request.

use crate::config::MessageDefaults;
use crate::constants::TARGET_NAME;
use chrono::{SecondsFormat, Utc};
use mailbox_runtime::Message;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct MessageFactory {
    defaults: MessageDefaults,
}

impl MessageFactory {
    pub fn new(defaults: MessageDefaults) -> Self {
        Self { defaults }
    }

    pub fn source(&self) -> &str {
        &self.defaults.source_name
    }

    /// Build a message with a fresh id and the current UTC time
    pub fn build(&self, message_type: impl Into<String>, payload: Value) -> Message {
        Message::new(
            Uuid::new_v4().to_string(),
            message_type,
            self.defaults.source_name.clone(),
            TARGET_NAME,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            payload,
        )
    }
}
