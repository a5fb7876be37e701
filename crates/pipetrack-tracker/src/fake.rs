//! In-memory watcher used by the tracker tests.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_util::stream;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

use pipetrack_client::http::decode_events;
use pipetrack_client::{ClientError, PipelineRunWatcher, WatchEvent, WatchEventType, WatchEvents};

type EventResult = Result<WatchEvent, ClientError>;

/// Watcher handing out one pre-wired subscription.
pub struct FakeWatcher {
    events: Mutex<Option<mpsc::UnboundedReceiver<EventResult>>>,
    fail_open: bool,
    released: Arc<AtomicUsize>,
}

/// Test-side handle pushing events into the subscription.
pub struct FakeWatch {
    tx: Option<mpsc::UnboundedSender<EventResult>>,
    released: Arc<AtomicUsize>,
}

/// Create a watcher and the handle feeding it.
pub fn fake_watch() -> (FakeWatcher, FakeWatch) {
    let (tx, rx) = mpsc::unbounded_channel();
    let released = Arc::new(AtomicUsize::new(0));
    (
        FakeWatcher {
            events: Mutex::new(Some(rx)),
            fail_open: false,
            released: released.clone(),
        },
        FakeWatch {
            tx: Some(tx),
            released,
        },
    )
}

/// A watcher whose subscription cannot be opened.
pub fn unreachable_watcher() -> FakeWatcher {
    let (watcher, _watch) = fake_watch();
    FakeWatcher {
        fail_open: true,
        ..watcher
    }
}

/// Pipeline run document with a condition status and `(task run, task)` entries.
pub fn pipeline_run(name: &str, status: &str, task_runs: &[(&str, &str)]) -> Value {
    let task_runs: serde_json::Map<String, Value> = task_runs
        .iter()
        .map(|(tr, task)| (tr.to_string(), json!({"pipelineTaskName": task})))
        .collect();

    json!({
        "metadata": {"name": name, "namespace": "ns"},
        "status": {
            "conditions": [{"type": "Succeeded", "status": status}],
            "taskRuns": task_runs
        }
    })
}

impl FakeWatch {
    /// Push a MODIFIED event carrying `object`.
    pub fn modify(&self, object: Value) {
        self.send(Ok(WatchEvent {
            event_type: WatchEventType::Modified,
            object,
        }));
    }

    /// Push an arbitrary item.
    pub fn send(&self, item: EventResult) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(item);
        }
    }

    /// End the subscription from the remote side.
    pub fn close(&mut self) {
        self.tx = None;
    }

    /// How many times the subscription has been dropped.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Yield to the runtime until the subscription is dropped.
    pub async fn wait_released(&self) -> usize {
        for _ in 0..100 {
            if self.released() > 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.released()
    }
}

/// Subscription stream that counts its own drop.
struct GuardedEvents {
    inner: UnboundedReceiverStream<EventResult>,
    released: Arc<AtomicUsize>,
}

impl Stream for GuardedEvents {
    type Item = EventResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for GuardedEvents {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PipelineRunWatcher for FakeWatcher {
    async fn watch_pipeline_run(
        &self,
        name: &str,
        _namespace: &str,
    ) -> Result<WatchEvents, ClientError> {
        if self.fail_open {
            return Err(ClientError::NotFound(name.to_string()));
        }

        let rx = self
            .events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ClientError::Connection("already watched".to_string()))?;

        Ok(Box::pin(GuardedEvents {
            inner: UnboundedReceiverStream::new(rx),
            released: self.released.clone(),
        }))
    }
}

/// Watcher whose subscription is a raw newline-delimited response body,
/// decoded the way the HTTP client decodes it.
pub struct WireWatcher {
    body: &'static str,
}

/// Create a watcher that serves `body` as one chunk.
pub fn wire_watcher(body: &'static str) -> WireWatcher {
    WireWatcher { body }
}

#[async_trait]
impl PipelineRunWatcher for WireWatcher {
    async fn watch_pipeline_run(
        &self,
        _name: &str,
        _namespace: &str,
    ) -> Result<WatchEvents, ClientError> {
        let chunks = stream::iter(vec![Ok::<_, ClientError>(self.body)]);
        Ok(Box::pin(decode_events(chunks)))
    }
}
