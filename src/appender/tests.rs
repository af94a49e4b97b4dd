use std::sync::Arc;

use uuid::Uuid;

use super::StreamAppender;
use crate::interfaces::{EventStore, StorageError};
use crate::storage::mock::MockEventStore;
use crate::types::UnsavedEvent;

fn batch(types: &[&str]) -> Vec<(i64, UnsavedEvent)> {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| (i as i64 + 1, UnsavedEvent::new(*t, vec![i as u8])))
        .collect()
}

#[tokio::test]
async fn test_append_assigns_versions_from_one() {
    let store = Arc::new(MockEventStore::new());
    let appender = StreamAppender::new(store);

    let recorded = appender
        .append(Uuid::new_v4(), batch(&["A", "B", "C"]))
        .await
        .unwrap();

    let versions: Vec<i64> = recorded.iter().map(|e| e.stream_version).collect();
    assert_eq!(versions, vec![1, 2, 3]);
    assert_eq!(recorded[0].event_type, "A");
    assert_eq!(recorded[2].event_type, "C");
}

#[tokio::test]
async fn test_append_continues_from_stream_head() {
    let store = Arc::new(MockEventStore::new());
    let appender = StreamAppender::new(store);
    let stream_uuid = Uuid::new_v4();

    appender
        .append(stream_uuid, batch(&["A", "B"]))
        .await
        .unwrap();
    let second = appender
        .append(
            stream_uuid,
            vec![(3, UnsavedEvent::new("C", vec![])), (4, UnsavedEvent::new("D", vec![]))],
        )
        .await
        .unwrap();

    let versions: Vec<i64> = second.iter().map(|e| e.stream_version).collect();
    assert_eq!(versions, vec![3, 4]);
}

#[tokio::test]
async fn test_append_keeps_streams_independent() {
    let store = Arc::new(MockEventStore::new());
    let appender = StreamAppender::new(store);

    appender
        .append(Uuid::new_v4(), batch(&["A", "B"]))
        .await
        .unwrap();
    let other = appender
        .append(Uuid::new_v4(), vec![(3, UnsavedEvent::new("A", vec![]))])
        .await
        .unwrap();

    assert_eq!(other[0].stream_version, 1);
}

#[tokio::test]
async fn test_append_empty_batch_is_noop() {
    let store = Arc::new(MockEventStore::new());
    let appender = StreamAppender::new(store.clone());

    let recorded = appender.append(Uuid::new_v4(), vec![]).await.unwrap();
    assert!(recorded.is_empty());
    assert_eq!(store.max_event_id().await.unwrap(), 0);
}

#[tokio::test]
async fn test_append_propagates_store_failure() {
    let store = Arc::new(MockEventStore::new());
    store.set_fail_on_insert(true).await;
    let appender = StreamAppender::new(store.clone());

    let err = appender
        .append(Uuid::new_v4(), batch(&["A"]))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));

    // Nothing persisted.
    assert_eq!(store.max_event_id().await.unwrap(), 0);
}
