//! Wire types for pipeline runs, task runs and watch events.
//!
//! Only the fields pipetrack reads are modelled; everything else in the
//! resource documents is ignored on decode.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// API group/version the resources are served under.
pub const API_VERSION: &str = "tekton.dev/v1alpha1";

/// Label carrying the task name on task runs.
pub const TASK_LABEL: &str = "tekton.dev/task";

/// Condition type reporting overall success.
pub const SUCCEEDED: &str = "Succeeded";

/// Object metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

/// A status condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCondition {
    #[serde(rename = "type", default)]
    pub condition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Find the `Succeeded` condition, falling back to the first one listed.
pub fn succeeded_condition(conditions: &[StatusCondition]) -> Option<&StatusCondition> {
    conditions
        .iter()
        .find(|c| c.condition_type == SUCCEEDED)
        .or_else(|| conditions.first())
}

/// A pipeline run resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: PipelineRunStatus,
}

/// Status sub-object of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunStatus {
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
    /// Child task runs keyed by task-run name, in document order.
    #[serde(default)]
    pub task_runs: IndexMap<String, PipelineRunTaskRunStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

/// Entry of the task-run map inside a pipeline run status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunTaskRunStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskRunStatus>,
}

/// Status sub-object of a task run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunStatus {
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

/// A task run resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRun {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: TaskRunStatus,
}

/// A list of task runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunList {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_list_kind")]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<TaskRun>,
}

impl Default for TaskRunList {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_list_kind(),
            items: Vec::new(),
        }
    }
}

impl TaskRunList {
    /// Sort items newest first by start time; runs that never started go last.
    pub fn sort_by_start_time(&mut self) {
        self.items
            .sort_by(|a, b| b.status.start_time.cmp(&a.status.start_time));
    }
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_list_kind() -> String {
    "TaskRunList".to_string()
}

/// Type of a watch notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchEventType {
    Added,
    Modified,
    Deleted,
    Bookmark,
    Error,
    #[serde(other)]
    Unknown,
}

impl WatchEventType {
    /// Returns true if the event carries a full resource representation.
    pub fn carries_object(&self) -> bool {
        matches!(self, Self::Added | Self::Modified | Self::Deleted)
    }
}

/// One line of a watch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEvent {
    #[serde(rename = "type")]
    pub event_type: WatchEventType,
    /// Raw resource; decoded by the consumer so bad objects can be skipped.
    #[serde(default)]
    pub object: serde_json::Value,
}
