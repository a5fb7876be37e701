//! Watch source: a pipeline run's change events as a stream of snapshots.
//!
//! The remote subscription is moved into a pump task that decodes events and
//! hands snapshots across a bounded channel. The pump owns the subscription,
//! so it is dropped exactly once: when the remote closes it, when it fails,
//! or when the [`WatchSource`] is closed or dropped (which aborts the pump).

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use pipetrack_client::{PipelineRun, PipelineRunWatcher, WatchEvent, WatchEvents};
use pipetrack_core::StatusSnapshot;

use crate::convert::snapshot_from_pipeline_run;
use crate::error::TrackerError;

type SnapshotResult = Result<StatusSnapshot, TrackerError>;

/// Live sequence of snapshots for one pipeline run.
///
/// Infinite until the remote closes the watch; not restartable. A transport
/// failure is yielded once as [`TrackerError::Connection`], then the stream
/// ends.
pub struct WatchSource {
    rx: mpsc::Receiver<SnapshotResult>,
    pump: JoinHandle<()>,
}

impl WatchSource {
    /// Open a watch on `name` in `namespace`.
    pub async fn open<C>(
        client: &C,
        name: &str,
        namespace: &str,
        capacity: usize,
    ) -> Result<Self, TrackerError>
    where
        C: PipelineRunWatcher + ?Sized,
    {
        let events = client
            .watch_pipeline_run(name, namespace)
            .await
            .map_err(|e| TrackerError::Connection(e.to_string()))?;

        let (tx, rx) = mpsc::channel(capacity.max(1));
        let pump = tokio::spawn(pump_events(
            events,
            tx,
            name.to_string(),
            namespace.to_string(),
        ));

        info!(pipeline_run = %name, namespace = %namespace, "Watch opened");
        Ok(Self { rx, pump })
    }

    /// Stop watching and release the subscription.
    pub fn close(self) {
        debug!("Closing watch");
        drop(self);
    }
}

impl Stream for WatchSource {
    type Item = SnapshotResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for WatchSource {
    fn drop(&mut self) {
        // No-op if the pump already finished
        self.pump.abort();
    }
}

/// Decode one watch event for the tracked pipeline run.
///
/// Returns `Ok(None)` for events that do not describe the tracked resource.
pub fn decode_event(
    event: WatchEvent,
    name: &str,
    namespace: &str,
) -> Result<Option<StatusSnapshot>, TrackerError> {
    if !event.event_type.carries_object() {
        debug!(event_type = ?event.event_type, "Ignoring watch event");
        return Ok(None);
    }

    let pr: PipelineRun = serde_json::from_value(event.object)
        .map_err(|e| TrackerError::MalformedEvent(e.to_string()))?;

    let same_namespace = pr
        .metadata
        .namespace
        .as_deref()
        .map_or(true, |ns| ns == namespace);
    if pr.metadata.name != name || !same_namespace {
        debug!(object = %pr.metadata.name, "Ignoring event for another resource");
        return Ok(None);
    }

    Ok(Some(snapshot_from_pipeline_run(&pr)))
}

async fn pump_events(
    mut events: WatchEvents,
    tx: mpsc::Sender<SnapshotResult>,
    name: String,
    namespace: String,
) {
    while let Some(item) = events.next().await {
        let decoded = item
            .map_err(TrackerError::from)
            .and_then(|event| decode_event(event, &name, &namespace));

        let snapshot = match decoded {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => continue,
            Err(TrackerError::MalformedEvent(reason)) => {
                warn!(pipeline_run = %name, reason = %reason, "Skipping malformed watch event");
                continue;
            }
            Err(e) => {
                warn!(pipeline_run = %name, error = %e, "Watch failed");
                let _ = tx.send(Err(e)).await;
                return;
            }
        };

        if tx.send(Ok(snapshot)).await.is_err() {
            debug!(pipeline_run = %name, "Snapshot receiver dropped");
            return;
        }
    }

    info!(pipeline_run = %name, "Watch closed by remote");
}
