//! Subscription registry and fan-out of committed events.
//!
//! Each subscriber owns a bounded queue drained by a dedicated task, so
//! `notify` only enqueues and the write path never waits on handler logic.
//! Within one subscriber, batches are delivered strictly in the order they
//! were enqueued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error};
use uuid::Uuid;

use crate::types::RecordedEvent;

/// What a subscriber wants to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Events of a single stream.
    Stream(Uuid),
    /// Events of every stream.
    All,
}

impl Scope {
    fn matches(&self, stream_uuid: Uuid) -> bool {
        match self {
            Scope::Stream(uuid) => *uuid == stream_uuid,
            Scope::All => true,
        }
    }
}

/// Receives committed event batches.
///
/// Errors are logged and dropped; they never reach the writer and the batch
/// is not redelivered.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(
        &self,
        events: Arc<Vec<RecordedEvent>>,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Identifies one live subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

struct Subscriber {
    scope: Scope,
    queue: mpsc::Sender<Arc<Vec<RecordedEvent>>>,
}

/// Concurrent-safe registry of live subscribers.
#[derive(Clone)]
pub struct Notifier {
    subscribers: Arc<RwLock<HashMap<u64, Subscriber>>>,
    next_handle: Arc<AtomicU64>,
    queue_capacity: usize,
}

impl Notifier {
    /// Create a notifier whose per-subscriber queues hold `queue_capacity`
    /// batches.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_handle: Arc::new(AtomicU64::new(1)),
            queue_capacity,
        }
    }

    /// Register a handler and spawn its delivery task.
    pub async fn subscribe(
        &self,
        scope: Scope,
        handler: Arc<dyn EventHandler>,
    ) -> SubscriptionHandle {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = mpsc::channel::<Arc<Vec<RecordedEvent>>>(self.queue_capacity);

        tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                if let Err(e) = handler.handle(batch).await {
                    error!(subscriber = id, error = %e, "Event handler failed");
                }
            }
        });

        self.subscribers
            .write()
            .await
            .insert(id, Subscriber { scope, queue: tx });

        debug!(subscriber = id, ?scope, "Subscribed");
        SubscriptionHandle(id)
    }

    /// Remove a subscription; its delivery task drains and exits.
    pub async fn unsubscribe(&self, handle: &SubscriptionHandle) {
        if self.subscribers.write().await.remove(&handle.0).is_some() {
            debug!(subscriber = handle.0, "Unsubscribed");
        }
    }

    /// Enqueue a committed batch to every subscriber matching the stream.
    ///
    /// Waits only for queue space, never for handler completion. A
    /// subscriber whose delivery task has stopped is skipped.
    pub async fn notify(&self, stream_uuid: Uuid, events: Arc<Vec<RecordedEvent>>) {
        let subscribers = self.subscribers.read().await;
        for (id, subscriber) in subscribers.iter() {
            if !subscriber.scope.matches(stream_uuid) {
                continue;
            }
            if subscriber.queue.send(Arc::clone(&events)).await.is_err() {
                error!(subscriber = id, "Delivery queue closed, dropping batch");
            }
        }
    }

    /// Number of live subscriptions.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

#[cfg(test)]
mod tests;
