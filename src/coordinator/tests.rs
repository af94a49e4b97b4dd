use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use super::WriteCoordinator;
use crate::config::CoordinatorConfig;
use crate::interfaces::{EventStore, StorageError};
use crate::notifier::Notifier;
use crate::storage::mock::MockEventStore;
use crate::types::UnsavedEvent;

async fn spawn_coordinator(store: Arc<MockEventStore>) -> WriteCoordinator {
    WriteCoordinator::spawn(store, Notifier::new(16), &CoordinatorConfig::default())
        .await
        .unwrap()
}

fn batch(n: usize) -> Vec<UnsavedEvent> {
    (0..n)
        .map(|i| UnsavedEvent::new("TestEvent", vec![i as u8]))
        .collect()
}

#[tokio::test]
async fn test_append_assigns_contiguous_ids_from_one() {
    let store = Arc::new(MockEventStore::new());
    let coordinator = spawn_coordinator(store).await;

    let recorded = coordinator
        .append(Uuid::new_v4(), batch(3))
        .await
        .unwrap();

    let ids: Vec<i64> = recorded.iter().map(|e| e.event_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_ids_increase_across_batches_and_streams() {
    let store = Arc::new(MockEventStore::new());
    let coordinator = spawn_coordinator(store).await;

    let first = coordinator
        .append(Uuid::new_v4(), batch(2))
        .await
        .unwrap();
    let second = coordinator
        .append(Uuid::new_v4(), batch(2))
        .await
        .unwrap();

    assert_eq!(first[1].event_id, 2);
    assert_eq!(second[0].event_id, 3);
    assert_eq!(second[1].event_id, 4);
}

#[tokio::test]
async fn test_empty_batch_short_circuits() {
    let store = Arc::new(MockEventStore::new());
    let coordinator = spawn_coordinator(store.clone()).await;

    let recorded = coordinator.append(Uuid::new_v4(), vec![]).await.unwrap();
    assert!(recorded.is_empty());
    assert_eq!(store.max_event_id().await.unwrap(), 0);
}

#[tokio::test]
async fn test_recovery_resumes_above_previous_maximum() {
    let store = Arc::new(MockEventStore::new());

    let first = spawn_coordinator(store.clone()).await;
    first.append(Uuid::new_v4(), batch(3)).await.unwrap();
    first.shutdown().await;

    let second = spawn_coordinator(store).await;
    let recorded = second.append(Uuid::new_v4(), batch(1)).await.unwrap();
    assert_eq!(recorded[0].event_id, 4);
}

#[tokio::test]
async fn test_recovery_failure_yields_no_coordinator() {
    let store = Arc::new(MockEventStore::new());
    store.set_fail_on_max_event_id(true).await;

    let err = WriteCoordinator::spawn(store, Notifier::new(16), &CoordinatorConfig::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StorageError::RecoveryFailed(_)));
}

#[tokio::test]
async fn test_failed_append_skips_ids_without_disturbing_later_appends() {
    let store = Arc::new(MockEventStore::new());
    let coordinator = spawn_coordinator(store.clone()).await;
    let stream = Uuid::new_v4();

    coordinator.append(stream, batch(2)).await.unwrap();

    store.set_fail_on_insert(true).await;
    let err = coordinator.append(stream, batch(3)).await.unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
    store.set_fail_on_insert(false).await;

    // Ids 3..=5 went to the failed batch and stay burned; versions continue
    // from the last committed event.
    let recorded = coordinator.append(stream, batch(1)).await.unwrap();
    assert_eq!(recorded[0].event_id, 6);
    assert_eq!(recorded[0].stream_version, 3);
}

#[tokio::test]
async fn test_concurrent_appends_never_interleave_ids() {
    let store = Arc::new(MockEventStore::new());
    let coordinator = Arc::new(spawn_coordinator(store).await);

    let appends = (0..10).map(|_| {
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.append(Uuid::new_v4(), batch(5)).await }
    });
    let results = join_all(appends).await;

    let mut batches: Vec<Vec<i64>> = results
        .into_iter()
        .map(|r| r.unwrap().iter().map(|e| e.event_id).collect())
        .collect();
    batches.sort_by_key(|ids| ids[0]);

    let mut expected = 1;
    for ids in batches {
        // Contiguous within the batch, no overlap between batches.
        for id in ids {
            assert_eq!(id, expected);
            expected += 1;
        }
    }
}

#[tokio::test]
async fn test_shutdown_then_respawn_over_same_store() {
    let store = Arc::new(MockEventStore::new());
    let coordinator = spawn_coordinator(store.clone()).await;
    coordinator.append(Uuid::new_v4(), batch(2)).await.unwrap();
    coordinator.shutdown().await;

    let another = spawn_coordinator(store).await;
    let recorded = another.append(Uuid::new_v4(), batch(1)).await.unwrap();
    assert_eq!(recorded[0].event_id, 3);
}
