//! Mailbox Runtime
//!
//! The single authority that buffers delivered messages and dispatches each
//! one to the actor registered for its type, strictly one at a time.
//!
//! ## Lifecycle
//!
//! A runtime starts **Stopped**. `deliver()` and `register()` are valid in
//! either state; messages delivered while stopped wait in the mailbox.
//! `start()` spawns the dispatch loop on the current tokio runtime and is a
//! no-op when already running. `stop()` only flips the state: an in-flight
//! `handle` call finishes, buffered messages stay buffered, and the loop exits
//! the next time it checks.
//!
//! ## Dispatch loop
//!
//! 1. Dequeue. On empty, wait on the mailbox for at most the idle interval and
//!    re-check the state.
//! 2. Look the actor up by `message_type`. Unrouted messages are discarded.
//! 3. Await `handle` before dequeuing again. Failures are logged and the loop
//!    moves on; nothing is re-queued.
//!
//! Each `start()` bumps a generation counter and the loop serializes on a
//! dispatch lock, so a `stop()` quickly followed by `start()` retires the old
//! loop before the new one dispatches anything.

use crate::actor::Actor;
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::mailbox::{InMemoryMailbox, Mailbox};
use crate::message::Message;
use crate::metrics::{RuntimeMetrics, RuntimeStats};
use crate::registry::ActorRegistry;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, trace};
use uuid::Uuid;

/// Surface exposed to producers and process wiring
pub trait Runtime: Send + Sync {
    /// Hand a message to the mailbox. Returns without waiting for it to be
    /// handled; acceptance does not imply successful processing.
    fn deliver(&self, message: Arc<Message>) -> Result<()>;

    /// Begin processing. Until this is called delivered messages stay buffered.
    fn start(&self) -> Result<()>;

    /// Halt processing. No guarantees about in-flight or buffered messages.
    fn stop(&self);
}

/// Delivery-only handle to a runtime's mailbox.
///
/// Given to actors so they can emit follow-up messages. It cannot reach the
/// registry or control the loop.
#[derive(Clone)]
pub struct DeliveryHandle {
    runtime_id: Arc<str>,
    mailbox: Arc<dyn Mailbox>,
    metrics: Arc<RuntimeMetrics>,
}

impl DeliveryHandle {
    pub fn deliver(&self, message: impl Into<Arc<Message>>) -> Result<()> {
        let message = message.into();
        trace!(
            runtime_id = %self.runtime_id,
            message_type = %message.message_type,
            message_id = %message.message_id,
            "Delivering message to mailbox"
        );
        self.mailbox.enqueue(message);
        self.metrics.record_delivered();
        Ok(())
    }
}

impl std::fmt::Debug for DeliveryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryHandle")
            .field("runtime_id", &self.runtime_id)
            .finish()
    }
}

/// State shared between runtime clones and the dispatch task
struct RuntimeShared {
    runtime_id: Arc<str>,
    config: RuntimeConfig,
    mailbox: Arc<dyn Mailbox>,
    registry: ActorRegistry,
    metrics: Arc<RuntimeMetrics>,
    delivery: DeliveryHandle,
    running: AtomicBool,
    /// Incremented by every effective `start()`
    generation: AtomicU64,
    /// Held by the active loop for its whole lifetime
    dispatch_lock: tokio::sync::Mutex<()>,
}

/// Reference runtime: one mailbox, one registry, one sequential dispatch loop.
///
/// Cloning is cheap and every clone controls the same runtime.
#[derive(Clone)]
pub struct MailboxRuntime {
    shared: Arc<RuntimeShared>,
}

impl MailboxRuntime {
    /// Create a stopped runtime over the given mailbox
    pub fn new(mailbox: Arc<dyn Mailbox>, config: RuntimeConfig) -> Result<Self> {
        config.validate()?;

        let runtime_id: Arc<str> = format!("runtime-{}", Uuid::new_v4().simple()).into();
        let metrics = Arc::new(RuntimeMetrics::default());
        let delivery = DeliveryHandle {
            runtime_id: Arc::clone(&runtime_id),
            mailbox: Arc::clone(&mailbox),
            metrics: Arc::clone(&metrics),
        };

        info!(
            runtime_id = %runtime_id,
            idle_interval_ms = config.idle_interval_ms,
            "Created mailbox runtime"
        );

        Ok(Self {
            shared: Arc::new(RuntimeShared {
                runtime_id,
                config,
                mailbox,
                registry: ActorRegistry::new(),
                metrics,
                delivery,
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                dispatch_lock: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Create a stopped runtime backed by an [`InMemoryMailbox`]
    pub fn in_memory(config: RuntimeConfig) -> Result<Self> {
        Self::new(Arc::new(InMemoryMailbox::new()), config)
    }

    /// Register `actor` for `message_type`, replacing any earlier actor.
    ///
    /// Valid in either state; takes effect for the next lookup.
    pub fn register<A: Actor>(&self, message_type: impl Into<String>, actor: A) {
        let message_type = message_type.into();
        let replaced = self
            .shared
            .registry
            .register(message_type.clone(), Arc::new(actor));

        debug!(
            runtime_id = %self.shared.runtime_id,
            message_type = %message_type,
            actor_type = std::any::type_name::<A>(),
            replaced = replaced,
            "Registered actor"
        );
    }

    /// Handle actors can use to emit follow-up messages
    pub fn delivery_handle(&self) -> DeliveryHandle {
        self.shared.delivery.clone()
    }

    pub fn runtime_id(&self) -> &str {
        &self.shared.runtime_id
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Current mailbox depth
    pub fn mailbox_size(&self) -> usize {
        self.shared.mailbox.size()
    }

    /// Number of message types with a registered actor
    pub fn registered_types(&self) -> usize {
        self.shared.registry.len()
    }

    pub fn metrics(&self) -> RuntimeStats {
        self.shared
            .metrics
            .snapshot(self.shared.mailbox.size(), self.is_running())
    }
}

impl Runtime for MailboxRuntime {
    fn deliver(&self, message: Arc<Message>) -> Result<()> {
        self.shared.delivery.deliver(message)
    }

    fn start(&self) -> Result<()> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| RuntimeError::NoAsyncRuntime)?;

        if self.shared.running.swap(true, Ordering::SeqCst) {
            debug!(runtime_id = %self.shared.runtime_id, "Runtime already running");
            return Ok(());
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        handle.spawn(dispatch_loop(Arc::clone(&self.shared), generation));

        info!(
            runtime_id = %self.shared.runtime_id,
            generation = generation,
            pending_messages = self.shared.mailbox.size(),
            "Runtime started"
        );
        Ok(())
    }

    fn stop(&self) {
        if self.shared.running.swap(false, Ordering::SeqCst) {
            info!(
                runtime_id = %self.shared.runtime_id,
                pending_messages = self.shared.mailbox.size(),
                "Runtime stopping"
            );
        }
    }
}

impl std::fmt::Debug for MailboxRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxRuntime")
            .field("runtime_id", &self.shared.runtime_id)
            .field("running", &self.is_running())
            .field("mailbox_size", &self.mailbox_size())
            .field("registry", &self.shared.registry)
            .finish()
    }
}

impl RuntimeShared {
    /// Whether the loop started as `generation` should keep going
    fn is_current(&self, generation: u64) -> bool {
        self.running.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    async fn dispatch(&self, message: Arc<Message>) {
        let Some(actor) = self.registry.find(&message.message_type) else {
            self.metrics.record_unrouted();
            debug!(
                runtime_id = %self.runtime_id,
                message_type = %message.message_type,
                message_id = %message.message_id,
                "No actor registered for message type, discarding"
            );
            return;
        };

        let start = Instant::now();
        let outcome = actor.handle(Arc::clone(&message)).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(()) => {
                self.metrics.record_handled(elapsed, true);
                trace!(
                    runtime_id = %self.runtime_id,
                    message_type = %message.message_type,
                    message_id = %message.message_id,
                    handling_duration_ns = elapsed.as_nanos() as u64,
                    "Message handled"
                );
            }
            Err(e) => {
                self.metrics.record_handled(elapsed, false);
                error!(
                    runtime_id = %self.runtime_id,
                    message_type = %message.message_type,
                    message_id = %message.message_id,
                    error = %e,
                    error_category = e.category(),
                    handling_duration_ns = elapsed.as_nanos() as u64,
                    "Actor execution failed"
                );
            }
        }
    }
}

async fn dispatch_loop(shared: Arc<RuntimeShared>, generation: u64) {
    let _active = shared.dispatch_lock.lock().await;
    let idle = shared.config.idle_interval();

    debug!(
        runtime_id = %shared.runtime_id,
        generation = generation,
        "Dispatch loop entered"
    );

    while shared.is_current(generation) {
        match shared.mailbox.dequeue() {
            Some(message) => shared.dispatch(message).await,
            None if idle.is_zero() => tokio::task::yield_now().await,
            None => shared.mailbox.wait_for_message(idle).await,
        }
    }

    debug!(
        runtime_id = %shared.runtime_id,
        generation = generation,
        "Dispatch loop exited"
    );
}
