//! Write coordinator: the single serialization point of the write path.
//!
//! One task owns the next-identifier counter and drains a bounded request
//! queue, so identifier assignment and version checks for two batches can
//! never interleave. The counter advances only on successful commits;
//! identifiers handed to a failed batch are permanently skipped, so the
//! global sequence may have gaps. On restart the counter is rederived from
//! the maximum committed identifier.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::appender::StreamAppender;
use crate::config::CoordinatorConfig;
use crate::interfaces::{EventStore, Result, StorageError};
use crate::notifier::Notifier;
use crate::types::{RecordedEvent, UnsavedEvent};

struct AppendRequest {
    stream_uuid: Uuid,
    events: Vec<UnsavedEvent>,
    reply: oneshot::Sender<Result<Vec<RecordedEvent>>>,
}

/// Handle to the coordinator task.
///
/// All appends go through [`WriteCoordinator::append`]; callers wait until
/// their batch is durably committed (or rejected) before resuming.
pub struct WriteCoordinator {
    request_tx: mpsc::Sender<AppendRequest>,
    handle: JoinHandle<()>,
}

impl WriteCoordinator {
    /// Recover the identifier counter and start the coordinator task.
    ///
    /// The counter is initialized to `max_event_id() + 1` before any request
    /// is accepted, so an uninitialized counter can never serve an append.
    /// If the recovery read fails, no coordinator is created.
    pub async fn spawn(
        store: Arc<dyn EventStore>,
        notifier: Notifier,
        config: &CoordinatorConfig,
    ) -> Result<Self> {
        let next_id = store
            .max_event_id()
            .await
            .map_err(|e| StorageError::RecoveryFailed(e.to_string()))?
            + 1;

        info!(next_id, "Write coordinator recovered identifier counter");

        let (request_tx, request_rx) = mpsc::channel(config.queue_capacity);
        let appender = StreamAppender::new(store);
        let handle = tokio::spawn(run(request_rx, appender, notifier, next_id));

        Ok(Self { request_tx, handle })
    }

    /// Append a batch of events to a stream, in order, atomically.
    ///
    /// An empty batch resolves immediately without touching the coordinator.
    pub async fn append(
        &self,
        stream_uuid: Uuid,
        events: Vec<UnsavedEvent>,
    ) -> Result<Vec<RecordedEvent>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.request_tx
            .send(AppendRequest {
                stream_uuid,
                events,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StorageError::CoordinatorShutDown)?;

        reply_rx.await.map_err(|_| StorageError::CoordinatorShutDown)?
    }

    /// Stop accepting requests, finish those already queued, then return.
    pub async fn shutdown(self) {
        drop(self.request_tx);
        if let Err(e) = self.handle.await {
            error!(error = %e, "Write coordinator task panicked");
        }
    }
}

async fn run(
    mut request_rx: mpsc::Receiver<AppendRequest>,
    appender: StreamAppender,
    notifier: Notifier,
    mut next_id: i64,
) {
    while let Some(request) = request_rx.recv().await {
        let count = request.events.len() as i64;
        let identified: Vec<(i64, UnsavedEvent)> = request
            .events
            .into_iter()
            .enumerate()
            .map(|(i, event)| (next_id + i as i64, event))
            .collect();

        match appender.append(request.stream_uuid, identified).await {
            Ok(events) => {
                next_id += count;
                let events = Arc::new(events);
                notifier
                    .notify(request.stream_uuid, Arc::clone(&events))
                    .await;
                // A caller that gave up waiting still gets its batch
                // committed; the reply is simply discarded.
                let _ = request.reply.send(Ok((*events).clone()));
            }
            Err(e) => {
                warn!(
                    stream_uuid = %request.stream_uuid,
                    error = %e,
                    "Append rejected"
                );
                let _ = request.reply.send(Err(e));
            }
        }
    }

    info!("Write coordinator stopped");
}

#[cfg(test)]
mod tests;
