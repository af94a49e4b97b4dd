//! SnapshotStore trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;
use crate::types::Snapshot;

/// Interface for snapshot persistence.
///
/// Snapshots are an optional optimization to avoid replaying an entire
/// event history. One snapshot is kept per source UUID; `put` upserts.
///
/// Implementations:
/// - `SqlSnapshotStore<Postgres>`: PostgreSQL storage
/// - `SqlSnapshotStore<Sqlite>`: SQLite storage
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Retrieve the snapshot for a source, `None` if there is none.
    async fn get(&self, source_uuid: Uuid) -> Result<Option<Snapshot>>;

    /// Store a snapshot, replacing any previous one for the same source.
    async fn put(&self, snapshot: Snapshot) -> Result<()>;

    /// Delete the snapshot for a source. Deleting a missing snapshot is
    /// not an error.
    async fn delete(&self, source_uuid: Uuid) -> Result<()>;
}
