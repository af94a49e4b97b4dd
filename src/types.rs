//! Domain types for event streams.
//!
//! Events come in two shapes: [`UnsavedEvent`] is what callers hand to the
//! write path, [`RecordedEvent`] is what the store hands back once the event
//! has an identity. Recorded events are immutable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event that has not yet been committed.
///
/// Carries everything the caller controls; the global event identifier,
/// stream version, and creation timestamp are assigned by the write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsavedEvent {
    /// Event type tag, e.g. `"OrderPlaced"`.
    pub event_type: String,
    /// Links related events across streams for tracing.
    pub correlation_id: Option<String>,
    /// Identifies the event (or command) that caused this one.
    pub causation_id: Option<String>,
    /// Opaque payload.
    pub data: Vec<u8>,
    /// Opaque metadata.
    pub metadata: Option<Vec<u8>>,
}

impl UnsavedEvent {
    /// Create an event with a type tag and raw payload.
    pub fn new(event_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            event_type: event_type.into(),
            correlation_id: None,
            causation_id: None,
            data,
            metadata: None,
        }
    }

    /// Create an event with a JSON payload.
    pub fn json<T: Serialize>(
        event_type: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event_type, serde_json::to_vec(payload)?))
    }

    /// Set the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Set the causation id.
    pub fn with_causation_id(mut self, causation_id: impl Into<String>) -> Self {
        self.causation_id = Some(causation_id.into());
        self
    }

    /// Set the metadata payload.
    pub fn with_metadata(mut self, metadata: Vec<u8>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A committed, immutable event.
///
/// `event_id` is unique and increases in commit order across the whole
/// store (gaps are permitted). `stream_version` is the event's 1-based
/// position within its stream: for a given stream the stored versions are
/// exactly 1..N with no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Store-wide monotonic identifier, assigned at commit time.
    pub event_id: i64,
    /// Internal identifier of the owning stream.
    pub stream_id: i64,
    /// 1-based position within the owning stream.
    pub stream_version: i64,
    /// Event type tag.
    pub event_type: String,
    /// Links related events across streams for tracing.
    pub correlation_id: Option<String>,
    /// Identifies the event (or command) that caused this one.
    pub causation_id: Option<String>,
    /// Opaque payload.
    pub data: Vec<u8>,
    /// Opaque metadata.
    pub metadata: Option<Vec<u8>>,
    /// RFC3339 creation timestamp, assigned at commit time.
    pub created_at: String,
}

/// Point-in-time state of a source, keyed by its UUID. Upserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// UUID of the source this snapshot was taken from.
    pub source_uuid: Uuid,
    /// Stream version the snapshot was taken at.
    pub source_version: i64,
    /// Type tag of the source state.
    pub source_type: String,
    /// Opaque serialized state.
    pub data: Vec<u8>,
}

/// Durable cursor of a named consumer over a stream.
///
/// Keyed by `(stream_uuid, name)`. Created and deleted explicitly by the
/// consumer; mutated only by acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCursor {
    /// External identity of the stream being tracked.
    pub stream_uuid: Uuid,
    /// Consumer-chosen subscription name.
    pub name: String,
    /// Highest acknowledged global event identifier.
    pub last_seen_event_id: i64,
    /// Highest acknowledged stream version.
    pub last_seen_stream_version: i64,
}
