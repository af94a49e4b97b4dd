use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use super::{EventHandler, Notifier, Scope};
use crate::types::RecordedEvent;

struct ChannelHandler {
    tx: mpsc::UnboundedSender<Arc<Vec<RecordedEvent>>>,
}

#[async_trait]
impl EventHandler for ChannelHandler {
    async fn handle(
        &self,
        events: Arc<Vec<RecordedEvent>>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tx.send(events)?;
        Ok(())
    }
}

struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(
        &self,
        _events: Arc<Vec<RecordedEvent>>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("handler is broken".into())
    }
}

fn channel_handler() -> (
    Arc<ChannelHandler>,
    mpsc::UnboundedReceiver<Arc<Vec<RecordedEvent>>>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelHandler { tx }), rx)
}

fn recorded(event_id: i64, stream_id: i64, stream_version: i64) -> RecordedEvent {
    RecordedEvent {
        event_id,
        stream_id,
        stream_version,
        event_type: "TestEvent".to_string(),
        correlation_id: None,
        causation_id: None,
        data: vec![],
        metadata: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

async fn recv(
    rx: &mut mpsc::UnboundedReceiver<Arc<Vec<RecordedEvent>>>,
) -> Arc<Vec<RecordedEvent>> {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("delivery channel closed")
}

#[tokio::test]
async fn test_stream_scope_receives_only_its_stream() {
    let notifier = Notifier::new(16);
    let stream = Uuid::new_v4();
    let other = Uuid::new_v4();

    let (handler, mut rx) = channel_handler();
    notifier.subscribe(Scope::Stream(stream), handler).await;

    notifier
        .notify(other, Arc::new(vec![recorded(1, 1, 1)]))
        .await;
    notifier
        .notify(stream, Arc::new(vec![recorded(2, 2, 1)]))
        .await;

    let batch = recv(&mut rx).await;
    assert_eq!(batch[0].event_id, 2);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_wildcard_scope_receives_everything_in_order() {
    let notifier = Notifier::new(16);
    let (handler, mut rx) = channel_handler();
    notifier.subscribe(Scope::All, handler).await;

    notifier
        .notify(Uuid::new_v4(), Arc::new(vec![recorded(1, 1, 1)]))
        .await;
    notifier
        .notify(Uuid::new_v4(), Arc::new(vec![recorded(2, 2, 1)]))
        .await;

    assert_eq!(recv(&mut rx).await[0].event_id, 1);
    assert_eq!(recv(&mut rx).await[0].event_id, 2);
}

#[tokio::test]
async fn test_batches_delivered_in_enqueue_order() {
    let notifier = Notifier::new(16);
    let stream = Uuid::new_v4();
    let (handler, mut rx) = channel_handler();
    notifier.subscribe(Scope::Stream(stream), handler).await;

    for i in 1..=5 {
        notifier
            .notify(stream, Arc::new(vec![recorded(i, 1, i)]))
            .await;
    }

    for i in 1..=5 {
        assert_eq!(recv(&mut rx).await[0].event_id, i);
    }
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let notifier = Notifier::new(16);
    let stream = Uuid::new_v4();
    let (handler, mut rx) = channel_handler();
    let handle = notifier.subscribe(Scope::Stream(stream), handler).await;
    assert_eq!(notifier.subscriber_count().await, 1);

    notifier.unsubscribe(&handle).await;
    assert_eq!(notifier.subscriber_count().await, 0);

    notifier
        .notify(stream, Arc::new(vec![recorded(1, 1, 1)]))
        .await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_failing_handler_does_not_affect_others() {
    let notifier = Notifier::new(16);
    let stream = Uuid::new_v4();

    notifier
        .subscribe(Scope::Stream(stream), Arc::new(FailingHandler))
        .await;
    let (handler, mut rx) = channel_handler();
    notifier.subscribe(Scope::Stream(stream), handler).await;

    notifier
        .notify(stream, Arc::new(vec![recorded(1, 1, 1)]))
        .await;
    notifier
        .notify(stream, Arc::new(vec![recorded(2, 1, 2)]))
        .await;

    assert_eq!(recv(&mut rx).await[0].event_id, 1);
    assert_eq!(recv(&mut rx).await[0].event_id, 2);
}
