//! Point-in-time view of a pipeline run.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::Condition;

/// Status of one task run as reported inside a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRunState {
    /// Pipeline task this run executes.
    pub task: String,

    /// Outcome of the task run so far.
    pub condition: Condition,

    /// Reason attached to the condition, if any.
    pub reason: Option<String>,

    /// Pod backing the task run, once scheduled.
    pub pod_name: Option<String>,

    /// When the task run started.
    pub started_at: Option<DateTime<Utc>>,

    /// When the task run finished.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRunState {
    /// Create a new TaskRunState for a pipeline task.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            condition: Condition::Unknown,
            reason: None,
            pod_name: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Create a TaskRunState, failing when the task name is absent or empty.
    pub fn try_new(task_run: &str, task: Option<&str>) -> Result<Self, CoreError> {
        match task {
            Some(task) if !task.is_empty() => Ok(Self::new(task)),
            _ => Err(CoreError::MissingField {
                task_run: task_run.to_string(),
                field: "pipelineTaskName",
            }),
        }
    }

    /// Builder method to set the condition and its reason.
    pub fn with_condition(mut self, condition: Condition, reason: Option<String>) -> Self {
        self.condition = condition;
        self.reason = reason;
        self
    }

    /// Builder method to set the pod name.
    pub fn with_pod_name(mut self, pod_name: impl Into<String>) -> Self {
        self.pod_name = Some(pod_name.into());
        self
    }

    /// Builder method to set start and completion times.
    pub fn with_times(
        mut self,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.started_at = started_at;
        self.completed_at = completed_at;
        self
    }
}

/// A pipeline run's condition plus its task-run map at one point in time.
///
/// Snapshots are built once and then only read. Entries keep the order in
/// which they were added, which is the order of the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    condition: Condition,
    reason: Option<String>,
    task_runs: IndexMap<String, TaskRunState>,
}

impl StatusSnapshot {
    /// Create an empty snapshot with the given condition.
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            reason: None,
            task_runs: IndexMap::new(),
        }
    }

    /// Builder method to set the condition reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Builder method to add a task run. A repeated name replaces the
    /// earlier entry but keeps its position.
    pub fn with_task_run(mut self, name: impl Into<String>, state: TaskRunState) -> Self {
        self.task_runs.insert(name.into(), state);
        self
    }

    /// Overall condition of the pipeline run.
    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// Reason attached to the pipeline run condition.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Check if the pipeline run has finished.
    pub fn is_terminal(&self) -> bool {
        self.condition.is_terminal()
    }

    /// Task runs keyed by task-run name, in insertion order.
    pub fn task_runs(&self) -> &IndexMap<String, TaskRunState> {
        &self.task_runs
    }

    /// Look up a single task run.
    pub fn task_run(&self, name: &str) -> Option<&TaskRunState> {
        self.task_runs.get(name)
    }
}
