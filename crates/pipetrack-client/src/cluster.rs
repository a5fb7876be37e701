//! Pipeline resources on the cluster.

use async_trait::async_trait;
use tracing::info;

use crate::error::ClientError;
use crate::http::{HttpClient, WatchEvents};
use crate::resource::{PipelineRun, TaskRunList, TASK_LABEL};

/// Opens watch subscriptions on pipeline runs.
#[async_trait]
pub trait PipelineRunWatcher: Send + Sync {
    /// Subscribe to change events for one named pipeline run.
    ///
    /// Fails if the cluster cannot be reached or the pipeline run does not
    /// exist. Each event carries the full resource, not a delta.
    async fn watch_pipeline_run(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<WatchEvents, ClientError>;
}

/// Lists task runs.
#[async_trait]
pub trait TaskRunLister: Send + Sync {
    /// List task runs in a namespace, optionally only those of one task.
    async fn list_task_runs(
        &self,
        namespace: &str,
        task: Option<&str>,
    ) -> Result<TaskRunList, ClientError>;
}

fn pipeline_runs_path(namespace: &str) -> String {
    format!("/apis/tekton.dev/v1alpha1/namespaces/{}/pipelineruns", namespace)
}

fn task_runs_path(namespace: &str) -> String {
    format!("/apis/tekton.dev/v1alpha1/namespaces/{}/taskruns", namespace)
}

impl HttpClient {
    /// Get a single pipeline run.
    pub async fn get_pipeline_run(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<PipelineRun, ClientError> {
        let path = format!("{}/{}", pipeline_runs_path(namespace), name);
        self.get_json(&path, &[]).await
    }
}

#[async_trait]
impl PipelineRunWatcher for HttpClient {
    async fn watch_pipeline_run(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<WatchEvents, ClientError> {
        // A field-selector watch on a missing object just idles, so check first.
        self.get_pipeline_run(name, namespace).await?;

        let selector = format!("metadata.name={}", name);
        info!(pipeline_run = %name, namespace = %namespace, "Watching pipeline run");

        self.watch(
            &pipeline_runs_path(namespace),
            &[("watch", "true"), ("fieldSelector", selector.as_str())],
        )
        .await
    }
}

#[async_trait]
impl TaskRunLister for HttpClient {
    async fn list_task_runs(
        &self,
        namespace: &str,
        task: Option<&str>,
    ) -> Result<TaskRunList, ClientError> {
        let path = task_runs_path(namespace);
        let mut list: TaskRunList = match task {
            Some(task) => {
                let selector = format!("{}={}", TASK_LABEL, task);
                self.get_json(&path, &[("labelSelector", selector.as_str())])
                    .await?
            }
            None => self.get_json(&path, &[]).await?,
        };

        list.sort_by_start_time();
        Ok(list)
    }
}
