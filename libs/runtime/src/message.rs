//! Message model
//!
//! A message is the only unit of work the runtime knows about. It records
//! intent, never execution, and is shared as `Arc<Message>` from the moment
//! it is delivered so nothing downstream can mutate it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable record of intent routed by `message_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Globally unique identifier, used by consumers for idempotency
    pub message_id: String,

    /// Routing key selecting the actor
    #[serde(rename = "type")]
    pub message_type: String,

    /// Logical sender, informational only
    pub source: String,

    /// Logical recipient, informational only
    pub target: String,

    /// ISO-8601 creation time set by the producer
    pub timestamp: String,

    /// Opaque domain data
    pub payload: Value,
}

impl Message {
    /// Build a message from fully producer-supplied fields.
    ///
    /// No field is defaulted here: generating ids and timestamps is the
    /// producer's job.
    pub fn new(
        message_id: impl Into<String>,
        message_type: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        timestamp: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            message_type: message_type.into(),
            source: source.into(),
            target: target.into(),
            timestamp: timestamp.into(),
            payload,
        }
    }

    /// Deserialize the payload into a domain type
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.payload)
    }
}
