//! Stream appender: version assignment and atomic batch persistence.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::interfaces::{EventStore, Result};
use crate::types::{RecordedEvent, UnsavedEvent};

/// Persists identified event batches into a stream.
///
/// Versions are assigned from the stream's current head; the batch goes in as
/// a single atomic statement, so it lands completely or not at all. The
/// unique index on `(stream_id, stream_version)` is the authoritative
/// conflict detector, covering writers outside this process too.
pub struct StreamAppender {
    store: Arc<dyn EventStore>,
}

impl StreamAppender {
    /// Create an appender over the given event store.
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Append a batch of events, each already carrying its global identifier.
    ///
    /// Resolves the stream (creating it on first use), assigns stream
    /// versions `base+1, base+2, ..` in input order, and inserts the whole
    /// batch atomically. A version collision fails the entire batch with
    /// `VersionConflict`; nothing is persisted.
    pub async fn append(
        &self,
        stream_uuid: Uuid,
        identified: Vec<(i64, UnsavedEvent)>,
    ) -> Result<Vec<RecordedEvent>> {
        if identified.is_empty() {
            return Ok(Vec::new());
        }

        let stream_id = self.store.resolve_or_create_stream(stream_uuid).await?;
        let base_version = self.store.current_version(stream_id).await?;
        let created_at = chrono::Utc::now().to_rfc3339();

        let events: Vec<RecordedEvent> = identified
            .into_iter()
            .enumerate()
            .map(|(i, (event_id, event))| RecordedEvent {
                event_id,
                stream_id,
                stream_version: base_version + 1 + i as i64,
                event_type: event.event_type,
                correlation_id: event.correlation_id,
                causation_id: event.causation_id,
                data: event.data,
                metadata: event.metadata,
                created_at: created_at.clone(),
            })
            .collect();

        self.store.insert_events(&events).await?;

        debug!(
            stream_uuid = %stream_uuid,
            count = events.len(),
            base_version,
            "Appended event batch"
        );

        Ok(events)
    }
}

#[cfg(test)]
mod tests;
