//! EventStore trait definition and storage errors.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::RecordedEvent;

/// Errors surfaced by storage and the write path.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The computed stream version for some event in a batch collided with
    /// an already-stored row. The caller raced another writer and must
    /// re-read stream state before retrying with a fresh batch.
    #[error("version conflict on stream {stream_id} at version {version}")]
    VersionConflict { stream_id: i64, version: i64 },

    /// Connectivity or transaction failure. Transient: nothing was
    /// committed, so the whole append is safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The identifier counter could not be rederived at startup. Fatal:
    /// the coordinator must not begin accepting writes.
    #[error("identifier recovery failed: {0}")]
    RecoveryFailed(String),

    /// The write coordinator task is no longer running.
    #[error("write coordinator has shut down")]
    CoordinatorShutDown,

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Unavailable(e)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Interface for event persistence.
///
/// Streams are identified externally by UUID and internally by a sequential
/// numeric id. The `(stream_id, stream_version)` pair is unique; the store's
/// uniqueness constraint is the authoritative write-conflict detector.
///
/// Implementations:
/// - `SqlEventStore<Postgres>`: PostgreSQL storage
/// - `SqlEventStore<Sqlite>`: SQLite storage
/// - `MockEventStore`: In-memory mock for testing
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Resolve a stream UUID to its internal id, creating the stream row if
    /// it does not yet exist. Idempotent and race-safe (first-write-wins).
    async fn resolve_or_create_stream(&self, stream_uuid: Uuid) -> Result<i64>;

    /// Highest stored version of a stream (0 if the stream has no events).
    async fn current_version(&self, stream_id: i64) -> Result<i64>;

    /// Insert a batch of fully-identified events atomically.
    ///
    /// All rows land or none do. A uniqueness violation on
    /// `(stream_id, stream_version)` fails the whole batch with
    /// [`StorageError::VersionConflict`]. Returns the number of rows written.
    async fn insert_events(&self, events: &[RecordedEvent]) -> Result<u64>;

    /// Highest event identifier in the store (0 if empty).
    ///
    /// Read once at startup to rederive the next-identifier counter.
    async fn max_event_id(&self) -> Result<i64>;

    /// Read a stream's events from `from_version` onwards, version order.
    ///
    /// Returns an empty vec for an unknown stream.
    async fn read_stream(
        &self,
        stream_uuid: Uuid,
        from_version: i64,
        limit: u64,
    ) -> Result<Vec<RecordedEvent>>;

    /// Read events across all streams from `from_event_id` onwards, in
    /// global identifier order.
    async fn read_all(&self, from_event_id: i64, limit: u64) -> Result<Vec<RecordedEvent>>;
}
