//! Actor contract
//!
//! An actor owns private state and handles one message per invocation. It is
//! only ever invoked by the runtime's dispatch loop, never by producers.
//!
//! Actors must not call other actors synchronously or wait on remote
//! responses. Business results leave an actor as new messages, delivered
//! through a [`DeliveryHandle`](crate::DeliveryHandle) it was given at
//! construction; the return value only reports whether execution itself
//! succeeded.

use crate::error::ActorResult;
use crate::message::Message;
use async_trait::async_trait;
use std::sync::Arc;

/// Execution unit registered under a message type
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// Handle a single message.
    ///
    /// `Err` signals execution failure to the runtime, which logs it and moves
    /// on to the next message. The message is not retried.
    async fn handle(&self, message: Arc<Message>) -> ActorResult;
}

#[async_trait]
impl<A: Actor + ?Sized> Actor for Arc<A> {
    async fn handle(&self, message: Arc<Message>) -> ActorResult {
        (**self).handle(message).await
    }
}
