//! SubscriptionStore trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;
use crate::types::SubscriptionCursor;

/// Interface for durable subscription cursors.
///
/// Tracks the last-acknowledged position per `(stream_uuid, name)` so a
/// consumer can resume after a disconnect or crash. Live delivery does not
/// touch these rows; acknowledgment is the consumer's responsibility.
///
/// Implementations:
/// - `SqlSubscriptionStore<Postgres>`: PostgreSQL storage
/// - `SqlSubscriptionStore<Sqlite>`: SQLite storage
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Create a subscription cursor at position zero.
    ///
    /// Creating an already-existing subscription leaves its position
    /// untouched.
    async fn create(&self, stream_uuid: Uuid, name: &str) -> Result<()>;

    /// Get a subscription cursor, `None` if it was never created.
    async fn get(&self, stream_uuid: Uuid, name: &str) -> Result<Option<SubscriptionCursor>>;

    /// Record the last event a consumer has processed.
    async fn ack(
        &self,
        stream_uuid: Uuid,
        name: &str,
        event_id: i64,
        stream_version: i64,
    ) -> Result<()>;

    /// Delete a subscription cursor. Deleting a missing one is not an error.
    async fn delete(&self, stream_uuid: Uuid, name: &str) -> Result<()>;
}
