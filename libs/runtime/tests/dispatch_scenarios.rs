//! End-to-end dispatch behavior of the mailbox runtime
//!
//! Covers ordering, fault isolation, unrouted messages, non-blocking
//! delivery, buffering before start, and follow-up messages emitted by
//! actors.

use async_trait::async_trait;
use mailbox_runtime::{
    Actor, ActorError, ActorResult, DeliveryHandle, MailboxRuntime, Message, Runtime,
    RuntimeConfig,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn message(id: &str, message_type: &str) -> Arc<Message> {
    Arc::new(Message::new(
        id,
        message_type,
        "test",
        "runtime",
        "2025-01-01T00:00:00.000Z",
        json!({ "id": id }),
    ))
}

fn runtime() -> MailboxRuntime {
    MailboxRuntime::in_memory(RuntimeConfig::with_idle_interval(Duration::from_millis(1)))
        .unwrap()
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

/// Records ids in arrival order, sleeps, and tracks overlapping invocations
#[derive(Default)]
struct RecordingActor {
    seen: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl RecordingActor {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Actor for RecordingActor {
    async fn handle(&self, message: Arc<Message>) -> ActorResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.seen.lock().push(message.message_id.clone());
        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct AlwaysFails;

#[async_trait]
impl Actor for AlwaysFails {
    async fn handle(&self, message: Arc<Message>) -> ActorResult {
        Err(ActorError::execution(format!(
            "cannot process {}",
            message.message_id
        )))
    }
}

#[derive(Default)]
struct FlagActor {
    flag: AtomicBool,
}

#[async_trait]
impl Actor for FlagActor {
    async fn handle(&self, _message: Arc<Message>) -> ActorResult {
        self.flag.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_handles_in_delivery_order() {
    let runtime = runtime();
    let actor = Arc::new(RecordingActor::with_delay(Duration::from_millis(5)));
    runtime.register("Test", Arc::clone(&actor));
    runtime.start().unwrap();

    for id in ["A", "B", "C"] {
        runtime.deliver(message(id, "Test")).unwrap();
    }

    wait_until(|| actor.seen().len() == 3).await;
    assert_eq!(actor.seen(), vec!["A", "B", "C"]);
    runtime.stop();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_invocations_never_overlap() {
    let runtime = runtime();
    let first = Arc::new(RecordingActor::with_delay(Duration::from_millis(1)));
    let second = Arc::new(RecordingActor::with_delay(Duration::from_millis(1)));
    runtime.register("First", Arc::clone(&first));
    runtime.register("Second", Arc::clone(&second));
    runtime.start().unwrap();

    // Producers on several worker threads
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let runtime = runtime.clone();
            tokio::spawn(async move {
                for i in 0..10 {
                    let message_type = if i % 2 == 0 { "First" } else { "Second" };
                    runtime
                        .deliver(message(&format!("{p}-{i}"), message_type))
                        .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }

    wait_until(|| first.seen().len() + second.seen().len() == 40).await;
    assert_eq!(first.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(second.max_in_flight.load(Ordering::SeqCst), 1);
    runtime.stop();
}

#[tokio::test]
async fn test_sequential_across_types() {
    let runtime = runtime();
    let log = Arc::new(RecordingActor::with_delay(Duration::from_millis(2)));
    // Same actor instance behind several types sees the global order
    for message_type in ["X", "Y", "Z"] {
        runtime.register(message_type, Arc::clone(&log));
    }
    runtime.start().unwrap();

    let delivered = ["1", "2", "3", "4", "5", "6"];
    for (id, message_type) in delivered.iter().zip(["X", "Y", "Z", "Z", "Y", "X"]) {
        runtime.deliver(message(id, message_type)).unwrap();
    }

    wait_until(|| log.seen().len() == delivered.len()).await;
    assert_eq!(log.seen(), delivered);
    assert_eq!(log.max_in_flight.load(Ordering::SeqCst), 1);
    runtime.stop();
}

#[tokio::test]
async fn test_failure_does_not_block_later_messages() {
    let runtime = runtime();
    let success = Arc::new(FlagActor::default());
    runtime.register("Fail", AlwaysFails);
    runtime.register("Success", Arc::clone(&success));
    runtime.start().unwrap();

    runtime.deliver(message("1", "Fail")).unwrap();
    runtime.deliver(message("2", "Success")).unwrap();

    wait_until(|| success.flag.load(Ordering::SeqCst)).await;
    let stats = runtime.metrics();
    assert_eq!(stats.messages_failed, 1);
    assert_eq!(stats.messages_succeeded(), 1);
    runtime.stop();
}

#[tokio::test]
async fn test_failing_type_keeps_being_dispatched() {
    let runtime = runtime();
    runtime.register("Fail", AlwaysFails);
    runtime.start().unwrap();

    for i in 0..5 {
        runtime.deliver(message(&i.to_string(), "Fail")).unwrap();
    }

    wait_until(|| runtime.metrics().messages_failed == 5).await;
    assert!(runtime.is_running());
    runtime.stop();
}

#[tokio::test]
async fn test_unregistered_type_is_discarded() {
    let runtime = runtime();
    runtime.start().unwrap();

    runtime.deliver(message("1", "Unregistered")).unwrap();

    wait_until(|| runtime.mailbox_size() == 0).await;
    wait_until(|| runtime.metrics().messages_unrouted == 1).await;
    assert!(runtime.is_running());
    runtime.stop();
}

#[tokio::test]
async fn test_deliver_does_not_wait_for_handler() {
    let runtime = runtime();
    let slow = Arc::new(RecordingActor::with_delay(Duration::from_millis(50)));
    runtime.register("Slow", Arc::clone(&slow));
    runtime.start().unwrap();

    runtime.deliver(message("1", "Slow")).unwrap();
    wait_until(|| slow.in_flight.load(Ordering::SeqCst) == 1).await;

    let start = Instant::now();
    runtime.deliver(message("2", "Slow")).unwrap();
    assert!(start.elapsed() < Duration::from_millis(10));

    wait_until(|| slow.seen().len() == 2).await;
    runtime.stop();
}

#[tokio::test]
async fn test_delivered_before_start_is_processed_after() {
    let runtime = runtime();
    let actor = Arc::new(FlagActor::default());
    runtime.register("Test", Arc::clone(&actor));

    runtime.deliver(message("1", "Test")).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(runtime.mailbox_size(), 1);
    assert!(!actor.flag.load(Ordering::SeqCst));

    runtime.start().unwrap();
    wait_until(|| actor.flag.load(Ordering::SeqCst)).await;
    assert_eq!(runtime.mailbox_size(), 0);
    runtime.stop();
}

#[tokio::test]
async fn test_stop_leaves_buffered_messages() {
    let runtime = runtime();
    let actor = Arc::new(RecordingActor::with_delay(Duration::from_millis(30)));
    runtime.register("Test", Arc::clone(&actor));
    runtime.start().unwrap();

    runtime.deliver(message("1", "Test")).unwrap();
    wait_until(|| actor.in_flight.load(Ordering::SeqCst) == 1).await;

    runtime.deliver(message("2", "Test")).unwrap();
    runtime.deliver(message("3", "Test")).unwrap();
    runtime.stop();

    // The in-flight handle completes; nothing else is drained
    wait_until(|| actor.in_flight.load(Ordering::SeqCst) == 0).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(actor.seen(), vec!["1"]);
    assert_eq!(runtime.mailbox_size(), 2);

    // Buffered messages resume on the next start
    runtime.start().unwrap();
    wait_until(|| actor.seen().len() == 3).await;
    assert_eq!(actor.seen(), vec!["1", "2", "3"]);
    runtime.stop();
}

#[tokio::test]
async fn test_register_while_running() {
    let runtime = runtime();
    runtime.start().unwrap();

    let late = Arc::new(FlagActor::default());
    runtime.register("Late", Arc::clone(&late));
    runtime.deliver(message("1", "Late")).unwrap();

    wait_until(|| late.flag.load(Ordering::SeqCst)).await;
    runtime.stop();
}

#[tokio::test]
async fn test_runtimes_have_independent_registries() {
    let a = runtime();
    let b = runtime();
    let actor = Arc::new(FlagActor::default());
    a.register("Shared", Arc::clone(&actor));
    b.start().unwrap();

    b.deliver(message("1", "Shared")).unwrap();
    wait_until(|| b.metrics().messages_unrouted == 1).await;
    assert!(!actor.flag.load(Ordering::SeqCst));
    assert_eq!(a.registered_types(), 1);
    assert_eq!(b.registered_types(), 0);
    b.stop();
}

/// Emits a follow-up message describing the outcome of each order
struct OrderActor {
    outbox: DeliveryHandle,
}

#[async_trait]
impl Actor for OrderActor {
    async fn handle(&self, message: Arc<Message>) -> ActorResult {
        let quantity: u64 = message.payload["quantity"]
            .as_u64()
            .ok_or_else(|| ActorError::invalid_payload("quantity missing"))?;

        // Business rejection is a message, not an error
        let outcome = if quantity == 0 { "OrderRejected" } else { "OrderAccepted" };
        self.outbox
            .deliver(Message::new(
                format!("{}-outcome", message.message_id),
                outcome,
                "orders",
                message.source.clone(),
                message.timestamp.clone(),
                json!({ "order_id": message.message_id }),
            ))
            .map_err(|e| ActorError::execution(e.to_string()))?;
        Ok(())
    }
}

#[tokio::test]
async fn test_actor_emits_follow_up_messages() {
    let runtime = runtime();
    let accepted = Arc::new(RecordingActor::default());
    let rejected = Arc::new(RecordingActor::default());
    runtime.register(
        "OrderPlaced",
        OrderActor {
            outbox: runtime.delivery_handle(),
        },
    );
    runtime.register("OrderAccepted", Arc::clone(&accepted));
    runtime.register("OrderRejected", Arc::clone(&rejected));
    runtime.start().unwrap();

    let place = |id: &str, quantity: u64| {
        Arc::new(Message::new(
            id,
            "OrderPlaced",
            "client",
            "orders",
            "2025-01-01T00:00:00.000Z",
            json!({ "quantity": quantity }),
        ))
    };
    runtime.deliver(place("o-1", 3)).unwrap();
    runtime.deliver(place("o-2", 0)).unwrap();

    wait_until(|| accepted.seen().len() == 1 && rejected.seen().len() == 1).await;
    assert_eq!(accepted.seen(), vec!["o-1-outcome"]);
    assert_eq!(rejected.seen(), vec!["o-2-outcome"]);
    assert_eq!(runtime.metrics().messages_failed, 0);
    runtime.stop();
}
