//! Tracker: reports task runs of one pipeline run as they appear.

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use pipetrack_client::PipelineRunWatcher;
use pipetrack_core::{diff, Diff, Run, TaskFilter};

use crate::error::TrackerError;
use crate::watch::WatchSource;

/// Batches of newly-appeared runs, ending when the pipeline run finishes.
pub type RunBatches = Pin<Box<dyn Stream<Item = Result<Vec<Run>, TrackerError>> + Send>>;

/// What `monitor` does when the remote closes the watch before the pipeline
/// run has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClosedWatch {
    /// Yield a [`TrackerError::Connection`], then end.
    #[default]
    Fail,
    /// End without an error.
    End,
}

/// Tracker tuning.
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// Capacity of the hand-off channel between the watch pump and `monitor`.
    pub channel_capacity: usize,

    /// Handling of a watch closed without a terminal condition.
    pub on_closed: ClosedWatch,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            on_closed: ClosedWatch::Fail,
        }
    }
}

/// Watches one pipeline run and reports its task runs.
pub struct Tracker<C: ?Sized> {
    name: String,
    namespace: String,
    client: Arc<C>,
    filter: TaskFilter,
    options: TrackerOptions,
}

impl<C> Tracker<C>
where
    C: PipelineRunWatcher + ?Sized + 'static,
{
    /// Create a tracker. No I/O happens until the first pull on [`monitor`].
    ///
    /// An empty `tasks` list reports runs of every task.
    ///
    /// [`monitor`]: Tracker::monitor
    pub fn new<I, S>(
        name: impl Into<String>,
        namespace: impl Into<String>,
        client: Arc<C>,
        tasks: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            client,
            filter: TaskFilter::new(tasks),
            options: TrackerOptions::default(),
        }
    }

    /// Builder method to set options.
    pub fn with_options(mut self, options: TrackerOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the tracked pipeline run.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace of the tracked pipeline run.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Task filter applied to every batch.
    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Stream batches of newly-appeared task runs.
    ///
    /// The watch is opened on the first pull. Empty batches are never
    /// yielded. The stream ends after the snapshot carrying a terminal
    /// condition has been processed, and stays ended on further pulls.
    /// Dropping the stream releases the watch.
    pub fn monitor(self) -> RunBatches {
        let session = Session {
            tracker: self,
            state: State::Idle,
            baseline: HashSet::new(),
        };

        Box::pin(stream::unfold(session, Session::step).fuse())
    }
}

enum State {
    Idle,
    Watching(WatchSource),
    Done,
}

/// Per-`monitor` state driven by the unfold loop.
struct Session<C: ?Sized> {
    tracker: Tracker<C>,
    state: State,
    baseline: HashSet<String>,
}

impl<C> Session<C>
where
    C: PipelineRunWatcher + ?Sized + 'static,
{
    async fn step(mut self) -> Option<(Result<Vec<Run>, TrackerError>, Self)> {
        if let State::Idle = self.state {
            if let Err(e) = self.open().await {
                warn!(pipeline_run = %self.tracker.name, error = %e, "Failed to open watch");
                self.finish();
                return Some((Err(e), self));
            }
        }

        loop {
            let State::Watching(source) = &mut self.state else {
                return None;
            };

            match source.next().await {
                Some(Ok(snapshot)) => {
                    let Diff {
                        new_runs,
                        task_run_names,
                    } = diff(&self.baseline, &snapshot, &self.tracker.filter);
                    self.baseline = task_run_names;

                    if snapshot.is_terminal() {
                        info!(
                            pipeline_run = %self.tracker.name,
                            condition = %snapshot.condition(),
                            "Pipeline run finished"
                        );
                        self.finish();
                    }

                    if !new_runs.is_empty() {
                        debug!(count = new_runs.len(), "New task runs");
                        return Some((Ok(new_runs), self));
                    }
                }
                Some(Err(e)) => {
                    self.finish();
                    return Some((Err(e), self));
                }
                None => {
                    self.finish();
                    return match self.tracker.options.on_closed {
                        ClosedWatch::Fail => {
                            let e = TrackerError::Connection(
                                "watch closed before the pipeline run finished".to_string(),
                            );
                            Some((Err(e), self))
                        }
                        ClosedWatch::End => None,
                    };
                }
            }
        }
    }

    async fn open(&mut self) -> Result<(), TrackerError> {
        let tracker = &self.tracker;
        let source = WatchSource::open(
            tracker.client.as_ref(),
            &tracker.name,
            &tracker.namespace,
            tracker.options.channel_capacity,
        )
        .await?;

        self.state = State::Watching(source);
        Ok(())
    }

    /// Move to `Done`, releasing the watch if one is open.
    fn finish(&mut self) {
        if let State::Watching(source) = std::mem::replace(&mut self.state, State::Done) {
            source.close();
        }
    }
}
