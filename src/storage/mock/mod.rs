//! In-memory mock stores for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::interfaces::{EventStore, Result, StorageError};
use crate::types::RecordedEvent;

#[derive(Default)]
struct MockState {
    streams: HashMap<Uuid, i64>,
    events: Vec<RecordedEvent>,
}

/// In-memory EventStore with failure injection.
#[derive(Default)]
pub struct MockEventStore {
    state: RwLock<MockState>,
    fail_on_insert: RwLock<bool>,
    fail_on_max_event_id: RwLock<bool>,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `insert_events` calls fail with `Unavailable`.
    pub async fn set_fail_on_insert(&self, fail: bool) {
        *self.fail_on_insert.write().await = fail;
    }

    /// Make subsequent `max_event_id` calls fail with `Unavailable`.
    pub async fn set_fail_on_max_event_id(&self, fail: bool) {
        *self.fail_on_max_event_id.write().await = fail;
    }

    fn unavailable() -> StorageError {
        StorageError::Unavailable(sqlx::Error::PoolClosed)
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn resolve_or_create_stream(&self, stream_uuid: Uuid) -> Result<i64> {
        let mut state = self.state.write().await;
        let next_id = state.streams.len() as i64 + 1;
        Ok(*state.streams.entry(stream_uuid).or_insert(next_id))
    }

    async fn current_version(&self, stream_id: i64) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|e| e.stream_id == stream_id)
            .map(|e| e.stream_version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_events(&self, events: &[RecordedEvent]) -> Result<u64> {
        if *self.fail_on_insert.read().await {
            return Err(Self::unavailable());
        }

        let mut state = self.state.write().await;
        for event in events {
            let occupied = state
                .events
                .iter()
                .any(|e| e.stream_id == event.stream_id && e.stream_version == event.stream_version);
            if occupied {
                return Err(StorageError::VersionConflict {
                    stream_id: event.stream_id,
                    version: event.stream_version,
                });
            }
        }
        state.events.extend_from_slice(events);
        Ok(events.len() as u64)
    }

    async fn max_event_id(&self) -> Result<i64> {
        if *self.fail_on_max_event_id.read().await {
            return Err(Self::unavailable());
        }

        let state = self.state.read().await;
        Ok(state.events.iter().map(|e| e.event_id).max().unwrap_or(0))
    }

    async fn read_stream(
        &self,
        stream_uuid: Uuid,
        from_version: i64,
        limit: u64,
    ) -> Result<Vec<RecordedEvent>> {
        let state = self.state.read().await;
        let Some(&stream_id) = state.streams.get(&stream_uuid) else {
            return Ok(Vec::new());
        };

        let mut events: Vec<RecordedEvent> = state
            .events
            .iter()
            .filter(|e| e.stream_id == stream_id && e.stream_version >= from_version)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.stream_version);
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn read_all(&self, from_event_id: i64, limit: u64) -> Result<Vec<RecordedEvent>> {
        let state = self.state.read().await;
        let mut events: Vec<RecordedEvent> = state
            .events
            .iter()
            .filter(|e| e.event_id >= from_event_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.event_id);
        events.truncate(limit as usize);
        Ok(events)
    }
}
