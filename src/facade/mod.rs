//! Public entry point wiring storage, coordinator, and notifier together.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::coordinator::WriteCoordinator;
use crate::interfaces::{EventStore, Result, SnapshotStore, SubscriptionStore};
use crate::notifier::{EventHandler, Notifier, Scope, SubscriptionHandle};
use crate::storage::init_storage;
use crate::types::{RecordedEvent, Snapshot, SubscriptionCursor, UnsavedEvent};

/// An open event store.
///
/// All writes go through the single coordinator owned by this instance;
/// reads go straight to the store. Dropping a `Quill` without calling
/// [`Quill::shutdown`] leaves queued appends unfinished.
pub struct Quill {
    coordinator: WriteCoordinator,
    notifier: Notifier,
    events: Arc<dyn EventStore>,
    snapshots: Arc<dyn SnapshotStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl Quill {
    /// Connect to the configured backend, create the schema if needed,
    /// recover the identifier counter, and start the write coordinator.
    pub async fn open(config: &Config) -> Result<Self> {
        let (events, snapshots, subscriptions) = init_storage(&config.storage).await?;
        let notifier = Notifier::new(config.notifier.queue_capacity);
        let coordinator =
            WriteCoordinator::spawn(Arc::clone(&events), notifier.clone(), &config.coordinator)
                .await?;

        info!("Event store opened");

        Ok(Self {
            coordinator,
            notifier,
            events,
            snapshots,
            subscriptions,
        })
    }

    /// Append a batch of events to a stream.
    ///
    /// The batch commits atomically; on success the returned events carry
    /// their assigned global identifiers and stream versions, and every
    /// matching subscriber has the batch queued for delivery.
    pub async fn append(
        &self,
        stream_uuid: Uuid,
        events: Vec<UnsavedEvent>,
    ) -> Result<Vec<RecordedEvent>> {
        self.coordinator.append(stream_uuid, events).await
    }

    /// Register a live handler for committed events.
    pub async fn subscribe(
        &self,
        scope: Scope,
        handler: Arc<dyn EventHandler>,
    ) -> SubscriptionHandle {
        self.notifier.subscribe(scope, handler).await
    }

    /// Remove a live handler.
    pub async fn unsubscribe(&self, handle: &SubscriptionHandle) {
        self.notifier.unsubscribe(handle).await;
    }

    /// Read a stream's events from `from_version`, at most `limit`.
    pub async fn read_stream(
        &self,
        stream_uuid: Uuid,
        from_version: i64,
        limit: u64,
    ) -> Result<Vec<RecordedEvent>> {
        self.events.read_stream(stream_uuid, from_version, limit).await
    }

    /// Read events across all streams from `from_event_id`, at most `limit`.
    pub async fn read_all(&self, from_event_id: i64, limit: u64) -> Result<Vec<RecordedEvent>> {
        self.events.read_all(from_event_id, limit).await
    }

    /// Fetch the snapshot for a source, if any.
    pub async fn snapshot(&self, source_uuid: Uuid) -> Result<Option<Snapshot>> {
        self.snapshots.get(source_uuid).await
    }

    /// Store a snapshot, replacing any previous one for the same source.
    pub async fn put_snapshot(&self, snapshot: Snapshot) -> Result<()> {
        self.snapshots.put(snapshot).await
    }

    /// Delete a source's snapshot.
    pub async fn delete_snapshot(&self, source_uuid: Uuid) -> Result<()> {
        self.snapshots.delete(source_uuid).await
    }

    /// Create a durable cursor for a named consumer of a stream.
    ///
    /// Idempotent: re-creating an existing cursor keeps its position.
    pub async fn create_subscription(&self, stream_uuid: Uuid, name: &str) -> Result<()> {
        self.subscriptions.create(stream_uuid, name).await
    }

    /// Fetch a durable cursor, if it exists.
    pub async fn subscription(
        &self,
        stream_uuid: Uuid,
        name: &str,
    ) -> Result<Option<SubscriptionCursor>> {
        self.subscriptions.get(stream_uuid, name).await
    }

    /// Advance a durable cursor past the given event.
    pub async fn ack_subscription(
        &self,
        stream_uuid: Uuid,
        name: &str,
        event_id: i64,
        stream_version: i64,
    ) -> Result<()> {
        self.subscriptions
            .ack(stream_uuid, name, event_id, stream_version)
            .await
    }

    /// Delete a durable cursor.
    pub async fn delete_subscription(&self, stream_uuid: Uuid, name: &str) -> Result<()> {
        self.subscriptions.delete(stream_uuid, name).await
    }

    /// Finish queued appends and stop the coordinator.
    pub async fn shutdown(self) {
        self.coordinator.shutdown().await;
        info!("Event store closed");
    }
}
