//! Converters between wire resources and domain snapshots.

use tracing::debug;

use pipetrack_client::resource::{
    succeeded_condition, PipelineRun, PipelineRunTaskRunStatus, StatusCondition,
};
use pipetrack_core::{Condition, StatusSnapshot, TaskRunState};

// ============================================================================
// Condition conversions
// ============================================================================

/// Condition and reason of the `Succeeded` condition in a list.
pub fn condition_of(conditions: &[StatusCondition]) -> (Condition, Option<String>) {
    match succeeded_condition(conditions) {
        Some(c) => (Condition::from_wire(c.status.as_deref()), c.reason.clone()),
        None => (Condition::Unknown, None),
    }
}

// ============================================================================
// Snapshot conversions
// ============================================================================

/// Build a snapshot from a pipeline run resource.
///
/// Task-run entries without a pipeline task name are left out of the
/// snapshot; they show up in a later one once the name is filled in.
pub fn snapshot_from_pipeline_run(pr: &PipelineRun) -> StatusSnapshot {
    let (condition, reason) = condition_of(&pr.status.conditions);

    let mut snapshot = StatusSnapshot::new(condition);
    if let Some(reason) = reason {
        snapshot = snapshot.with_reason(reason);
    }

    pr.status
        .task_runs
        .iter()
        .fold(snapshot, |snapshot, (name, entry)| match task_run_state(name, entry) {
            Some(state) => snapshot.with_task_run(name.clone(), state),
            None => snapshot,
        })
}

fn task_run_state(name: &str, entry: &PipelineRunTaskRunStatus) -> Option<TaskRunState> {
    let state = match TaskRunState::try_new(name, entry.pipeline_task_name.as_deref()) {
        Ok(state) => state,
        Err(e) => {
            debug!(task_run = %name, error = %e, "Dropping task run entry");
            return None;
        }
    };

    let Some(status) = &entry.status else {
        return Some(state);
    };

    let (condition, reason) = condition_of(&status.conditions);
    let mut state = state
        .with_condition(condition, reason)
        .with_times(status.start_time, status.completion_time);
    if let Some(pod) = &status.pod_name {
        state = state.with_pod_name(pod.clone());
    }
    Some(state)
}
