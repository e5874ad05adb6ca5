//! Runtime Error Types
//!
//! Errors raised by the runtime itself (configuration, loop spawning,
//! delivery) and the failure signal actors return from `handle`.

use thiserror::Error;

/// Errors surfaced by the runtime surface
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Invalid runtime configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// `start()` was called outside of a tokio runtime
    #[error("No async runtime available to spawn the dispatch loop")]
    NoAsyncRuntime,

    /// The message could not be handed to the mailbox
    #[error("Delivery failed for message {message_id}: {reason}")]
    Delivery { message_id: String, reason: String },
}

impl RuntimeError {
    /// Create configuration error
    pub fn configuration(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// Create delivery error
    pub fn delivery(message_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Delivery {
            message_id: message_id.into(),
            reason: reason.into(),
        }
    }

    /// Short category label used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            RuntimeError::Configuration { .. } => "configuration",
            RuntimeError::NoAsyncRuntime => "spawn",
            RuntimeError::Delivery { .. } => "delivery",
        }
    }
}

/// Execution failure returned by an actor.
///
/// This signals a bug or infrastructure fault while handling a message. A
/// business-level rejection is not an error; actors report it by delivering
/// a follow-up message instead.
#[derive(Error, Debug)]
pub enum ActorError {
    #[error("Execution failed: {reason}")]
    Execution { reason: String },

    #[error("Payload rejected: {reason}")]
    InvalidPayload { reason: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ActorError {
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }

    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ActorError::Execution { .. } => "execution",
            ActorError::InvalidPayload { .. } => "payload",
            ActorError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for ActorError {
    fn from(err: serde_json::Error) -> Self {
        ActorError::invalid_payload(err.to_string())
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Outcome of a single `Actor::handle` invocation
pub type ActorResult = std::result::Result<(), ActorError>;
