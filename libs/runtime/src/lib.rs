//! Mailbox Runtime
//!
//! Message-driven execution with a single dispatch authority. Producers hand
//! immutable [`Message`]s to a [`Runtime`]; the runtime buffers them in a
//! [`Mailbox`] and a single loop dispatches each one to the [`Actor`]
//! registered for its type, one at a time.
//!
//! # Architecture
//!
//! ```text
//! producers ──deliver()──▶ ┌─────────────┐
//!   (HTTP ingress,         │   Mailbox   │  FIFO, unbounded, thread-safe
//!    actors via            └──────┬──────┘
//!    DeliveryHandle)              │ dequeue (dispatch loop, one task)
//!                                 ▼
//!                          ┌─────────────┐
//!                          │  Registry   │  message type → actor
//!                          └──────┬──────┘
//!                                 │ handle(message), awaited
//!                                 ▼
//!                          ┌─────────────┐
//!                          │    Actor    │  private state, emits messages
//!                          └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use mailbox_runtime::{
//!     Actor, ActorResult, MailboxRuntime, Message, Runtime, RuntimeConfig,
//! };
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     async fn handle(&self, message: Arc<Message>) -> ActorResult {
//!         println!("hello from {}", message.source);
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> mailbox_runtime::Result<()> {
//! let runtime = MailboxRuntime::in_memory(RuntimeConfig::default())?;
//! runtime.register("Greet", Greeter);
//! runtime.start()?;
//!
//! runtime.deliver(Arc::new(Message::new(
//!     "msg-1",
//!     "Greet",
//!     "docs",
//!     "runtime",
//!     "2025-01-01T00:00:00.000Z",
//!     serde_json::json!({}),
//! )))?;
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod metrics;
mod registry;
pub mod runtime;

pub use actor::Actor;
pub use config::{RuntimeConfig, DEFAULT_IDLE_INTERVAL_MS, MAX_IDLE_INTERVAL_MS};
pub use error::{ActorError, ActorResult, Result, RuntimeError};
pub use mailbox::{InMemoryMailbox, Mailbox};
pub use message::Message;
pub use metrics::{RuntimeMetrics, RuntimeStats};
pub use runtime::{DeliveryHandle, MailboxRuntime, Runtime};
